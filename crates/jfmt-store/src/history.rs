//! Content-addressed, size-bounded history of formatted results.
//!
//! The whole list lives under one key as a JSON array, newest first. Every
//! mutation rewrites the full array, so a failed write leaves the previous
//! list intact.

use crate::kv::KvStore;
use jfmt_core::hash::is_hex;
use jfmt_core::{
    digest, rfc3339, Digest, HistoryEntry, StorageCorrupt, HISTORY_CAPACITY, HISTORY_KEY,
};
use time::OffsetDateTime;

/// Shortest digest prefix accepted by [`History::resolve`].
pub const MIN_PREFIX_LEN: usize = 4;

pub struct History<S> {
    kv: S,
}

impl<S: KvStore> History<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Entries newest first, or why the stored list could not be read.
    ///
    /// A blob that cannot be decoded surfaces as [`StorageCorrupt`]; a failed
    /// read of the underlying store passes through as is.
    pub fn try_list(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        let Some(raw) = self.kv.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<HistoryEntry> =
            serde_json::from_str(&raw).map_err(|e| StorageCorrupt {
                key: HISTORY_KEY.to_string(),
                reason: e.to_string(),
            })?;
        entries.truncate(HISTORY_CAPACITY);
        Ok(entries)
    }

    /// Entries newest first. Unreadable state is logged and treated as empty.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.try_list().unwrap_or_else(|e| {
            tracing::warn!(error = %format!("{e:#}"), "ignoring unreadable history");
            Vec::new()
        })
    }

    /// Starting point for a mutation. Only a corrupt blob is replaced; read
    /// failures abort so an intact list is never overwritten.
    fn load_for_update(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        match self.try_list() {
            Err(e) if e.is::<StorageCorrupt>() => {
                tracing::warn!(error = %e, "discarding unreadable history");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    pub fn get(&self, digest: &Digest) -> Option<HistoryEntry> {
        self.list().into_iter().find(|e| &e.digest == digest)
    }

    /// Resolve a full digest or a unique prefix of one.
    pub fn resolve(&self, prefix: &str) -> anyhow::Result<Digest> {
        let prefix = prefix.trim().to_ascii_lowercase();
        if prefix.len() < MIN_PREFIX_LEN || !is_hex(&prefix) {
            anyhow::bail!(
                "invalid digest prefix '{prefix}': need at least {MIN_PREFIX_LEN} hex characters"
            );
        }
        let matches: Vec<Digest> = self
            .list()
            .into_iter()
            .map(|e| e.digest)
            .filter(|d| d.as_str().starts_with(&prefix))
            .collect();
        match matches.len() {
            0 => anyhow::bail!("no history entry matches {prefix}"),
            1 => Ok(matches.into_iter().next().expect("one match")),
            n => {
                let preview: Vec<_> = matches.iter().take(5).map(|d| d.short()).collect();
                anyhow::bail!(
                    "ambiguous prefix '{prefix}': {n} matches ({}...)",
                    preview.join(", ")
                );
            }
        }
    }

    /// Record `content` at the front, replacing an entry with the same digest
    /// and evicting the oldest beyond capacity.
    pub fn record(&self, content: &str) -> anyhow::Result<HistoryEntry> {
        self.record_at(content, OffsetDateTime::now_utc())
    }

    pub fn record_at(&self, content: &str, at: OffsetDateTime) -> anyhow::Result<HistoryEntry> {
        let entry = HistoryEntry {
            digest: digest(content),
            content: content.to_string(),
            created_at: rfc3339(at),
        };
        let mut entries = self.load_for_update()?;
        let before = entries.len();
        entries.retain(|e| e.digest != entry.digest);
        let refreshed = entries.len() != before;
        entries.insert(0, entry.clone());
        entries.truncate(HISTORY_CAPACITY);
        self.save(&entries)?;
        tracing::debug!(digest = %entry.digest.short(), refreshed, "recorded history entry");
        Ok(entry)
    }

    /// Remove the entry with `digest`. Returns whether one was removed.
    pub fn delete(&self, digest: &Digest) -> anyhow::Result<bool> {
        let mut entries = self.load_for_update()?;
        let before = entries.len();
        entries.retain(|e| &e.digest != digest);
        if entries.len() == before {
            return Ok(false);
        }
        self.save(&entries)?;
        Ok(true)
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        self.save(&[])
    }

    fn save(&self, entries: &[HistoryEntry]) -> anyhow::Result<()> {
        let blob = serde_json::to_string(entries)?;
        self.kv.set(HISTORY_KEY, &blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileKv, MemoryKv};
    use time::Duration;

    fn contents(h: &History<&MemoryKv>) -> Vec<String> {
        h.list().into_iter().map(|e| e.content).collect()
    }

    #[test]
    fn empty_store_lists_nothing() {
        let kv = MemoryKv::new();
        let h = History::new(&kv);
        assert!(h.list().is_empty());
        assert_eq!(h.try_list().unwrap(), Vec::new());
    }

    #[test]
    fn newest_entry_comes_first() {
        let kv = MemoryKv::new();
        let h = History::new(&kv);
        h.record("1").unwrap();
        h.record("2").unwrap();
        h.record("3").unwrap();
        assert_eq!(contents(&h), vec!["3", "2", "1"]);
    }

    #[test]
    fn recording_same_content_twice_keeps_one_refreshed_entry() {
        let kv = MemoryKv::new();
        let h = History::new(&kv);
        let t0 = OffsetDateTime::UNIX_EPOCH;
        h.record_at("{\"a\":1}", t0).unwrap();
        h.record_at("[]", t0 + Duration::seconds(1)).unwrap();
        let again = h
            .record_at("{\"a\":1}", t0 + Duration::seconds(2))
            .unwrap();

        let list = h.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], again);
        assert_eq!(list[0].created_at, "1970-01-01T00:00:02Z");
        assert_eq!(list[1].content, "[]");
    }

    #[test]
    fn capacity_evicts_oldest() {
        let kv = MemoryKv::new();
        let h = History::new(&kv);
        for i in 0..=HISTORY_CAPACITY {
            h.record(&format!("[{i}]")).unwrap();
        }
        let list = h.list();
        assert_eq!(list.len(), HISTORY_CAPACITY);
        assert!(h.get(&digest("[0]")).is_none());
        assert_eq!(list[0].content, format!("[{HISTORY_CAPACITY}]"));
        assert_eq!(list[HISTORY_CAPACITY - 1].content, "[1]");
    }

    #[test]
    fn touching_an_old_entry_saves_it_from_eviction() {
        let kv = MemoryKv::new();
        let h = History::new(&kv);
        for i in 0..HISTORY_CAPACITY {
            h.record(&format!("[{i}]")).unwrap();
        }
        h.record("[0]").unwrap();
        h.record("[new]").unwrap();
        assert!(h.get(&digest("[0]")).is_some());
        assert!(h.get(&digest("[1]")).is_none());
    }

    #[test]
    fn delete_removes_only_target_and_keeps_order() {
        let kv = MemoryKv::new();
        let h = History::new(&kv);
        h.record("a").unwrap();
        h.record("b").unwrap();
        h.record("c").unwrap();

        assert!(h.delete(&digest("b")).unwrap());
        assert!(h.get(&digest("b")).is_none());
        assert_eq!(contents(&h), vec!["c", "a"]);
    }

    #[test]
    fn delete_missing_is_noop() {
        let kv = MemoryKv::new();
        let h = History::new(&kv);
        h.record("a").unwrap();
        assert!(!h.delete(&digest("zzz")).unwrap());
        assert_eq!(contents(&h), vec!["a"]);
    }

    #[test]
    fn clear_empties_and_persists() {
        let kv = MemoryKv::new();
        let h = History::new(&kv);
        h.record("a").unwrap();
        h.clear().unwrap();
        assert!(h.list().is_empty());
        assert_eq!(kv.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn corrupt_blob_reads_as_empty() {
        let kv = MemoryKv::new();
        kv.set(HISTORY_KEY, "{not json").unwrap();
        let h = History::new(&kv);
        assert!(h.list().is_empty());
        let err = h.try_list().unwrap_err();
        assert_eq!(err.downcast_ref::<StorageCorrupt>().unwrap().key, HISTORY_KEY);
    }

    #[test]
    fn wrong_shape_is_corrupt_too() {
        let kv = MemoryKv::new();
        kv.set(HISTORY_KEY, r#"[{"hash":"x"}]"#).unwrap();
        let h = History::new(&kv);
        assert!(h.try_list().is_err());
        assert!(h.list().is_empty());
    }

    #[test]
    fn malformed_digest_makes_blob_corrupt() {
        let kv = MemoryKv::new();
        kv.set(
            HISTORY_KEY,
            r#"[{"digest":"abcdefghijké","content":"{}","createdAt":"x"}]"#,
        )
        .unwrap();
        let h = History::new(&kv);
        assert!(h.list().is_empty());
        let err = h.try_list().unwrap_err();
        assert!(err.is::<StorageCorrupt>());
    }

    /// Reads fail, writes go through to `inner`.
    struct FailingReads {
        inner: MemoryKv,
    }

    impl KvStore for FailingReads {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("device not ready")
        }
        fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> anyhow::Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn read_failure_aborts_mutation_without_overwriting() {
        let inner = MemoryKv::new();
        History::new(&inner).record("[1]").unwrap();
        let before = inner.get(HISTORY_KEY).unwrap();

        let h = History::new(FailingReads { inner });
        let err = h.record("[2]").unwrap_err();
        assert!(!err.is::<StorageCorrupt>());
        assert!(h.delete(&digest("[1]")).is_err());
        assert!(h.list().is_empty());
        assert_eq!(h.kv.inner.get(HISTORY_KEY).unwrap(), before);
    }

    #[test]
    fn record_over_corrupt_blob_starts_fresh() {
        let kv = MemoryKv::new();
        kv.set(HISTORY_KEY, "garbage").unwrap();
        let h = History::new(&kv);
        h.record("{}").unwrap();
        assert_eq!(contents(&h), vec!["{}"]);
    }

    #[test]
    fn persisted_layout_uses_camel_case_and_newest_first() {
        let kv = MemoryKv::new();
        let h = History::new(&kv);
        h.record("1").unwrap();
        h.record("2").unwrap();
        let raw = kv.get(HISTORY_KEY).unwrap().unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let arr = v.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["content"], "2");
        assert_eq!(arr[0]["digest"], digest("2").as_str());
        assert!(arr[0]["createdAt"].is_string());
    }

    #[test]
    fn resolve_by_prefix() {
        let kv = MemoryKv::new();
        let h = History::new(&kv);
        let entry = h.record("{\"k\":true}").unwrap();
        let full = entry.digest.as_str();

        assert_eq!(h.resolve(full).unwrap(), entry.digest);
        assert_eq!(h.resolve(&full[..8]).unwrap(), entry.digest);
        assert_eq!(h.resolve(&full[..8].to_uppercase()).unwrap(), entry.digest);
    }

    #[test]
    fn resolve_rejects_short_unknown_and_non_hex() {
        let kv = MemoryKv::new();
        let h = History::new(&kv);
        h.record("x").unwrap();
        assert!(h.resolve("ab").is_err());
        assert!(h.resolve("zzzz").is_err());
        let err = h.resolve("0000000000").unwrap_err();
        assert!(err.to_string().contains("no history entry matches"));
    }

    #[test]
    fn file_backed_history_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let h = History::new(FileKv::new(tmp.path()));
            h.record("{\"a\":1}").unwrap();
            h.record("[1,2]").unwrap();
        }
        let h = History::new(FileKv::new(tmp.path()));
        let list = h.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].content, "[1,2]");
    }

    #[test]
    fn unreadable_file_is_soft_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        let kv_dir = tmp.path().join("kv");
        std::fs::create_dir_all(&kv_dir).unwrap();
        std::fs::write(kv_dir.join(HISTORY_KEY), [0xff, 0xfe, 0x00]).unwrap();
        let h = History::new(FileKv::new(tmp.path()));
        assert!(h.list().is_empty());
        assert!(h.try_list().is_err());
        h.record("[]").unwrap();
        assert_eq!(h.list().len(), 1);
    }
}
