/// Default number of characters shown in a history preview.
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

/// Truncate `content` to `max_chars` characters (appending `...` when cut)
/// and escape `<`, `>` and `&` so the result is safe inside markup.
pub fn preview(content: &str, max_chars: usize) -> String {
    let mut cut: String = content.chars().take(max_chars).collect();
    if content.chars().nth(max_chars).is_some() {
        cut.push_str("...");
    }
    escape_markup(&cut)
}

fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    out
}
