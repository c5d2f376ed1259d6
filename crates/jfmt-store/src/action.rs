use crate::buffer::save_last_content;
use crate::history::History;
use crate::kv::KvStore;
use jfmt_core::{process, EditError, HistoryEntry, Mode};

/// Result of a successful format or compress.
#[derive(Debug, Clone)]
pub struct Applied {
    /// Canonical output, also the new buffer content.
    pub output: String,
    pub entry: HistoryEntry,
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Format or compress `text`, then record the output in history and make it
/// the current buffer. Nothing is persisted when the input is rejected.
pub fn apply(kv: &impl KvStore, text: &str, mode: Mode) -> Result<Applied, ActionError> {
    let output = process(text, mode)?;
    let entry = History::new(kv).record(&output)?;
    save_last_content(kv, &output)?;
    tracing::debug!(%mode, digest = %entry.digest.short(), bytes = output.len(), "applied");
    Ok(Applied { output, entry })
}
