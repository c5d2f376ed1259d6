use crate::io::{read_input, write_output, InputArgs};
use jfmt_core::Mode;
use jfmt_store::{apply, FileKv};
use std::path::Path;

/// `jfmt format` / `jfmt compress`
pub fn execute(
    root: &Path,
    input: &InputArgs,
    output: Option<&Path>,
    mode: Mode,
) -> anyhow::Result<()> {
    let kv = FileKv::new(root);
    let text = read_input(&input.source(), &kv)?;
    let applied = apply(&kv, &text, mode)?;
    write_output(output, &applied.output)?;

    let verb = match mode {
        Mode::Format => "Formatted",
        Mode::Compress => "Compressed",
    };
    eprintln!(
        "{verb} ({} bytes), saved to history as {}",
        applied.output.len(),
        applied.entry.digest.short()
    );
    if let Some(path) = output {
        eprintln!("Exported to {}", path.display());
    }
    Ok(())
}
