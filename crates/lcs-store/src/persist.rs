//! Writing a store's entries to its storage target.

use std::fs;
use std::io::Write;
use std::path::Path;

use lcs_codec::encode_document;
use lcs_types::{Entry, StorageTarget, SyncMode};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Serialize `entries` and replace the file at `target.path` with them.
///
/// The document is written to a temporary file next to the target and then
/// renamed over it, so the target always holds either the old or the new
/// contents. Missing parent directories are created.
pub fn write_document(target: &StorageTarget, entries: &[Entry]) -> StoreResult<()> {
    if !target.writable {
        return Err(StoreError::NotWritable);
    }

    let bytes = target.charset.encode(&encode_document(entries));

    let dir = match target.path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.flush()?;
    if matches!(target.sync_mode, SyncMode::EveryWrite) {
        tmp.as_file().sync_all()?;
    }
    tmp.persist(&target.path).map_err(|e| StoreError::Io(e.error))?;

    debug!(
        path = %target.path.display(),
        charset = %target.charset,
        entries = entries.len(),
        bytes = bytes.len(),
        "document written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcs_types::Charset;

    fn sample() -> Vec<Entry> {
        vec![
            Entry::comment("# demo"),
            Entry::property("name", "Roby"),
            Entry::comment(""),
            Entry::property("height", "173"),
        ]
    }

    #[test]
    fn writes_terminated_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.properties");
        write_document(&StorageTarget::writable(&path, Charset::Utf8), &sample()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "# demo\nname=Roby\n\nheight=173\n");
    }

    #[test]
    fn replaces_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.properties");
        fs::write(&path, "old=contents\nthat=is\nmuch=longer\n").unwrap();

        let target = StorageTarget::writable(&path, Charset::Utf8);
        write_document(&target, &[Entry::property("a", "1")]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a=1\n");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("x.properties");
        write_document(&StorageTarget::writable(&path, Charset::Utf8), &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn encodes_with_target_charset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin.properties");
        let target = StorageTarget::writable(&path, Charset::Iso8859_1);
        write_document(&target, &[Entry::property("city", "Zürich")]).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes, b"city=Z\xfcrich\n".to_vec());
    }

    #[test]
    fn every_write_sync_mode_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synced.properties");
        let target =
            StorageTarget::writable(&path, Charset::Utf8).with_sync_mode(SyncMode::EveryWrite);
        write_document(&target, &sample()).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("# demo\n"));
    }

    #[test]
    fn not_writable_target_is_rejected() {
        let err = write_document(&StorageTarget::default(), &sample()).unwrap_err();
        assert!(matches!(err, StoreError::NotWritable));
    }

    #[test]
    fn unwritable_location_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        // A regular file cannot act as a parent directory.
        let target = StorageTarget::writable(blocker.join("child.properties"), Charset::Utf8);
        let err = write_document(&target, &sample()).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
