use clap::Subcommand;
use jfmt_core::preview::preview;
use jfmt_core::{Digest, HistoryEntry};
use jfmt_store::{save_last_content, Config, FileKv, History};
use std::path::Path;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum HistoryCmd {
    /// List saved results, newest first
    List {
        /// Maximum number of entries to show (0 = all)
        #[arg(long, default_value_t = 0)]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a saved result
    Show {
        /// Digest or unique prefix
        digest: String,
    },
    /// Make a saved result the current buffer and print it
    Load {
        /// Digest or unique prefix
        digest: String,
    },
    /// Delete a saved result
    Delete {
        /// Digest or unique prefix
        digest: String,
    },
    /// Delete all saved results
    Clear {
        /// Confirm clearing the whole history
        #[arg(long)]
        yes: bool,
    },
}

// ── Dispatch ──

pub fn run(cmd: HistoryCmd, root: &Path) -> anyhow::Result<()> {
    match cmd {
        HistoryCmd::List { limit, json } => list(root, limit, json),
        HistoryCmd::Show { digest } => show(root, &digest),
        HistoryCmd::Load { digest } => load(root, &digest),
        HistoryCmd::Delete { digest } => delete(root, &digest),
        HistoryCmd::Clear { yes } => clear(root, yes),
    }
}

// ── Command Implementations ──

/// `jfmt history list`
pub fn list(root: &Path, limit: usize, json: bool) -> anyhow::Result<()> {
    let history = History::new(FileKv::new(root));
    let mut entries = history.try_list().unwrap_or_else(|e| {
        eprintln!("warning: {e:#}; treating history as empty");
        Vec::new()
    });
    if limit > 0 {
        entries.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("(no history)");
        return Ok(());
    }
    let config = Config::load(root);
    for entry in &entries {
        println!("{}", render_line(entry, config.preview_chars));
    }
    Ok(())
}

fn render_line(entry: &HistoryEntry, preview_chars: usize) -> String {
    let flat: String = entry
        .content
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!(
        "{}  {}  {}",
        entry.digest.short(),
        entry.created_at,
        preview(&flat, preview_chars)
    )
}

fn find(history: &History<FileKv>, prefix: &str) -> anyhow::Result<HistoryEntry> {
    let digest = history.resolve(prefix)?;
    history
        .get(&digest)
        .ok_or_else(|| anyhow::anyhow!("no history entry matches {prefix}"))
}

/// `jfmt history show <digest>`
pub fn show(root: &Path, prefix: &str) -> anyhow::Result<()> {
    let history = History::new(FileKv::new(root));
    let entry = find(&history, prefix)?;
    println!("{}", entry.content);
    Ok(())
}

/// `jfmt history load <digest>`
pub fn load(root: &Path, prefix: &str) -> anyhow::Result<()> {
    let kv = FileKv::new(root);
    let entry = find(&History::new(kv.clone()), prefix)?;
    save_last_content(&kv, &entry.content)?;
    println!("{}", entry.content);
    eprintln!("Loaded history entry {}", entry.digest.short());
    Ok(())
}

/// `jfmt history delete <digest>`
///
/// A full digest that is not in the history is a no-op; a prefix has to match.
pub fn delete(root: &Path, prefix: &str) -> anyhow::Result<()> {
    let history = History::new(FileKv::new(root));
    let digest = match prefix.parse::<Digest>() {
        Ok(full) => full,
        Err(_) => history.resolve(prefix)?,
    };
    if history.delete(&digest)? {
        eprintln!("Deleted history entry {}", digest.short());
    } else {
        eprintln!("No history entry {}", digest.short());
    }
    Ok(())
}

/// `jfmt history clear --yes`
pub fn clear(root: &Path, yes: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("refusing to clear history without --yes");
    }
    History::new(FileKv::new(root)).clear()?;
    eprintln!("History cleared");
    Ok(())
}
