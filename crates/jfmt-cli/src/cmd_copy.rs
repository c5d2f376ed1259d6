use crate::clipboard::{self, copy_text, Clipboard, CopyMethod, Osc52, SystemClipboard};
use crate::io::{read_input, InputArgs};
use jfmt_store::{Config, FileKv};
use std::io::{IsTerminal, Read};
use std::path::Path;

/// `jfmt copy [FILE]`
pub fn execute(root: &Path, input: &InputArgs) -> anyhow::Result<()> {
    let text = read_input(&input.source(), &FileKv::new(root))?;
    if text.is_empty() {
        anyhow::bail!("nothing to copy");
    }

    let config = Config::load(root);
    let mut osc = Osc52::new(std::io::stderr());
    let fallback: Option<&mut dyn Clipboard> =
        if config.clipboard_fallback && std::io::stderr().is_terminal() {
            Some(&mut osc)
        } else {
            None
        };

    match copy_text(&text, &mut SystemClipboard, fallback)? {
        CopyMethod::System => eprintln!("Copied to clipboard"),
        CopyMethod::Terminal => eprintln!("Copied to clipboard (via terminal)"),
    }
    Ok(())
}

/// `jfmt __clipboard-serve`, spawned by `copy`
pub fn serve() -> anyhow::Result<()> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    clipboard::serve(&text, &mut std::io::stdout())?;
    Ok(())
}
