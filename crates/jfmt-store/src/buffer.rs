//! The persisted editor buffer (`lastContent`), overwritten on every edit.

use crate::kv::KvStore;
use jfmt_core::LAST_CONTENT_KEY;

/// Last saved buffer, if any. Read failures are logged and read as absent.
pub fn load_last_content(kv: &impl KvStore) -> Option<String> {
    match kv.get(LAST_CONTENT_KEY) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "ignoring unreadable buffer");
            None
        }
    }
}

pub fn save_last_content(kv: &impl KvStore, content: &str) -> anyhow::Result<()> {
    kv.set(LAST_CONTENT_KEY, content)
}

/// Reset the buffer to empty text.
pub fn clear_last_content(kv: &impl KvStore) -> anyhow::Result<()> {
    kv.set(LAST_CONTENT_KEY, "")
}
