use clap::Subcommand;
use jfmt_store::config::{read_config, set_value, Config, CLIPBOARD_FALLBACK, PREVIEW_CHARS};
use jfmt_store::config_path;
use std::path::Path;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (preview_chars, clipboard_fallback)
        key: String,
        /// Config value (true/false/number/string)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, root: &Path) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(root, &key, &value),
        ConfigCmd::Get { key } => get(root, &key),
        ConfigCmd::List => list(root),
    }
}

// ── Command Implementations ──

/// `jfmt config set <key> <value>`
pub fn set(root: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let stored = set_value(root, key, value)?;
    println!("{key} = {stored}");
    Ok(())
}

/// `jfmt config get <key>`
pub fn get(root: &Path, key: &str) -> anyhow::Result<()> {
    let config = read_config(&config_path(root))?;
    match config.get(key) {
        Some(val) => println!("{val}"),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `jfmt config list`
pub fn list(root: &Path) -> anyhow::Result<()> {
    let config = read_config(&config_path(root))?;
    let effective = Config::from_map(&config)?;
    println!("{PREVIEW_CHARS} = {}", effective.preview_chars);
    println!("{CLIPBOARD_FALLBACK} = {}", effective.clipboard_fallback);
    for (k, v) in &config {
        if k != PREVIEW_CHARS && k != CLIPBOARD_FALLBACK {
            println!("{k} = {v}");
        }
    }
    Ok(())
}
