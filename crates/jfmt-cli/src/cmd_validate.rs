use crate::io::{read_input, InputArgs};
use jfmt_core::inspect::{json_size, json_type, validate};
use jfmt_core::parse;
use jfmt_store::FileKv;
use std::path::Path;

/// `jfmt validate [FILE]`: strict check, no repair.
pub fn validate_cmd(root: &Path, input: &InputArgs, json: bool) -> anyhow::Result<()> {
    let text = read_input(&input.source(), &FileKv::new(root))?;
    let result = validate(text.trim());
    if json {
        println!("{}", serde_json::to_string(&result)?);
    } else if result.valid {
        println!("valid");
    }
    match result.error {
        Some(error) => anyhow::bail!("invalid JSON: {error}"),
        None => Ok(()),
    }
}

/// `jfmt info [FILE]`: root type and size.
pub fn info(root: &Path, input: &InputArgs) -> anyhow::Result<()> {
    let text = read_input(&input.source(), &FileKv::new(root))?;
    let value = parse(text.trim()).map_err(|e| anyhow::anyhow!("invalid JSON: {e}"))?;
    let size = json_size(&text) as u64;
    println!("Type: {}", json_type(&value));
    println!("Size: {} ({} bytes)", format_size(size), size);
    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
