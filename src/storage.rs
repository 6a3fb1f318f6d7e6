use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::error::StorageError;
use crate::snapshot::Snapshot;

/// Where the last persisted snapshot lives between runs.
pub trait SnapshotStore {
    /// `None` means the page has never been checked.
    fn load(&self) -> Result<Option<Snapshot>, StorageError>;
    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError>;
}

/// A single UTF-8 text file holding the snapshot verbatim.
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, action: &'static str, source: std::io::Error) -> StorageError {
        StorageError {
            action,
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.is_empty() => Ok(None),
            Ok(text) => Ok(Some(Snapshot::from_stored(text))),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no snapshot at {}", self.path.display());
                Ok(None)
            }
            Err(err) => Err(self.error("read", err)),
        }
    }

    // temp file in the same directory, then rename: the snapshot is never
    // left truncated
    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let write_failed = |err| self.error("write", err);
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(write_failed)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_failed)?;
        tmp.write_all(snapshot.as_str().as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(write_failed)?;
        tmp.persist(&self.path).map_err(|err| write_failed(err.error))?;
        debug!("wrote snapshot to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_loads_as_never_checked() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("snapshot.txt"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn empty_file_loads_as_never_checked() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.txt");
        fs::write(&path, "").unwrap();
        assert!(FileSnapshotStore::new(path).load().unwrap().is_none());
    }

    #[test]
    fn saved_snapshot_loads_back_verbatim() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("state").join("snapshot.txt"));
        let snap = Snapshot::from_stored("Birkin Bag\nKelly Bag".to_string());
        store.save(&snap).unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "Birkin Bag\nKelly Bag"
        );
        assert_eq!(store.load().unwrap(), Some(snap));
    }

    #[test]
    fn save_replaces_previous_snapshot_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("snapshot.txt"));
        store
            .save(&Snapshot::from_stored("Birkin Bag\nKelly Bag".to_string()))
            .unwrap();
        store
            .save(&Snapshot::from_stored("Kelly Bag".to_string()))
            .unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "Kelly Bag");
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("snapshot.txt")]);
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        // a non-empty directory where the snapshot should go blocks the rename
        let store = FileSnapshotStore::new(dir.path().join("snapshot.txt"));
        fs::create_dir(store.path()).unwrap();
        fs::write(store.path().join("inner"), "Kelly Bag").unwrap();

        let err = store
            .save(&Snapshot::from_stored("Birkin Bag".to_string()))
            .unwrap_err();
        assert_eq!(err.action, "write");
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("snapshot.txt")]);
        assert_eq!(
            fs::read_to_string(store.path().join("inner")).unwrap(),
            "Kelly Bag"
        );
    }

    #[test]
    fn sentinel_is_a_real_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("snapshot.txt"));
        store
            .save(&Snapshot::from_names(Default::default()))
            .unwrap();
        assert!(store.load().unwrap().unwrap().is_sentinel());
    }

    #[test]
    fn unreadable_path_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        // a directory cannot be read as a file
        let store = FileSnapshotStore::new(dir.path());
        let err = store.load().unwrap_err();
        assert_eq!(err.action, "read");
        assert!(store.save(&Snapshot::from_stored("A".into())).is_err());
    }
}
