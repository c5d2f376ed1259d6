use crate::error::EditError;
use crate::repair::parse;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

const INDENT: &[u8] = b"    ";

/// Output style of an edit action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Four-space indentation, one element per line.
    Format,
    /// No whitespace between tokens.
    Compress,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Format => write!(f, "format"),
            Mode::Compress => write!(f, "compress"),
        }
    }
}

/// Pretty-print with four-space indentation. Key order follows the source.
pub fn format(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value
        .serialize(&mut ser)
        .expect("JSON value serialization should not fail");
    String::from_utf8(buf).expect("serde_json emits UTF-8")
}

/// Serialize without any insignificant whitespace.
pub fn compress(value: &Value) -> String {
    serde_json::to_string(value).expect("JSON value serialization should not fail")
}

/// Parse `text` (with repair) and render it in `mode`, producing the
/// canonical string for history and the editor buffer.
pub fn process(text: &str, mode: Mode) -> Result<String, EditError> {
    if text.trim().is_empty() {
        return Err(EditError::EmptyInput);
    }
    // Surrounding whitespace is legal JSON; parsing the text as given keeps
    // error positions relative to what the user supplied.
    let value = parse(text)?;
    Ok(match mode {
        Mode::Format => format(&value),
        Mode::Compress => compress(&value),
    })
}
