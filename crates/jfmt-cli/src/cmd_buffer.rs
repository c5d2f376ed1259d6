use crate::io::{read_input, Source};
use clap::Subcommand;
use jfmt_store::{clear_last_content, load_last_content, save_last_content, FileKv};
use std::path::{Path, PathBuf};

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum BufferCmd {
    /// Print the saved buffer
    Show,
    /// Replace the saved buffer with raw text (not validated)
    Set {
        /// Read from FILE ("-" or omitted for stdin)
        file: Option<String>,
    },
    /// Empty the saved buffer
    Clear,
}

// ── Dispatch ──

pub fn run(cmd: BufferCmd, root: &Path) -> anyhow::Result<()> {
    match cmd {
        BufferCmd::Show => show(root),
        BufferCmd::Set { file } => set(root, file.as_deref()),
        BufferCmd::Clear => clear(root),
    }
}

// ── Command Implementations ──

/// `jfmt buffer show`
pub fn show(root: &Path) -> anyhow::Result<()> {
    match load_last_content(&FileKv::new(root)) {
        Some(content) if !content.is_empty() => println!("{content}"),
        _ => eprintln!("(empty buffer)"),
    }
    Ok(())
}

/// `jfmt buffer set [FILE]`
pub fn set(root: &Path, file: Option<&str>) -> anyhow::Result<()> {
    let kv = FileKv::new(root);
    let source = match file {
        None | Some("-") => Source::Stdin,
        Some(path) => Source::File(PathBuf::from(path)),
    };
    let text = read_input(&source, &kv)?;
    save_last_content(&kv, &text)?;
    eprintln!("Buffer saved ({} bytes)", text.len());
    Ok(())
}

/// `jfmt buffer clear`
pub fn clear(root: &Path) -> anyhow::Result<()> {
    clear_last_content(&FileKv::new(root))?;
    eprintln!("Buffer cleared");
    Ok(())
}
