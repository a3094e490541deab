use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::charset::Charset;

/// Flush/sync strategy for commits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Rely on OS page-cache buffering (fastest, least durable).
    #[default]
    OsDefault,
    /// `fsync` the written file before it replaces the target.
    EveryWrite,
}

/// Where a store persists its entries on commit.
///
/// A target that is not `writable` turns every commit into a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageTarget {
    pub writable: bool,
    pub path: PathBuf,
    #[serde(default)]
    pub charset: Charset,
    #[serde(default)]
    pub sync_mode: SyncMode,
}

impl StorageTarget {
    /// A writable target at `path` using `charset`.
    pub fn writable(path: impl Into<PathBuf>, charset: Charset) -> Self {
        Self {
            writable: true,
            path: path.into(),
            charset,
            sync_mode: SyncMode::default(),
        }
    }

    /// Builder-style override of the sync mode.
    pub fn with_sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = sync_mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_target_is_not_writable() {
        let t = StorageTarget::default();
        assert!(!t.writable);
        assert_eq!(t.charset, Charset::Utf8);
        assert_eq!(t.sync_mode, SyncMode::OsDefault);
    }

    #[test]
    fn writable_builder() {
        let t = StorageTarget::writable("/tmp/a.properties", Charset::Iso8859_1)
            .with_sync_mode(SyncMode::EveryWrite);
        assert!(t.writable);
        assert_eq!(t.path, PathBuf::from("/tmp/a.properties"));
        assert_eq!(t.charset, Charset::Iso8859_1);
        assert_eq!(t.sync_mode, SyncMode::EveryWrite);
    }

    #[test]
    fn deserialize_fills_defaults() {
        let t: StorageTarget =
            serde_json::from_str(r#"{"writable":true,"path":"demo.properties"}"#).unwrap();
        assert!(t.writable);
        assert_eq!(t.charset, Charset::Utf8);
        assert_eq!(t.sync_mode, SyncMode::OsDefault);
    }
}
