//! Snapshot file on disk
//!
//! Writes go to a temporary file next to the target which is then renamed
//! over it, so readers see either the previous file or the new one.

use crate::snapshot::WalletSnapshot;
use crate::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the snapshot inside a wallet data directory
pub const SNAPSHOT_FILE_NAME: &str = "mwcwallet.dat";

/// Atomically replace `path` with `bytes`
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// The `mwcwallet.dat` file of one wallet instance
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Snapshot file inside `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SNAPSHOT_FILE_NAME),
        }
    }

    /// Full path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the prior state.
    ///
    /// A missing, unreadable or corrupt file all yield `None`, the same as a
    /// first run.
    pub fn load(&self) -> Option<WalletSnapshot> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No wallet snapshot at {}", self.path.display());
                return None;
            }
            Err(e) => {
                tracing::warn!("Unable to read {}: {}", self.path.display(), e);
                return None;
            }
        };

        match WalletSnapshot::decode(&bytes) {
            Ok(snapshot) => {
                tracing::debug!(
                    "Loaded wallet snapshot version {:#x} from {}",
                    snapshot.version,
                    self.path.display()
                );
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring wallet snapshot {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// Encode and atomically write a snapshot
    pub fn save(&self, snapshot: &WalletSnapshot) -> Result<()> {
        let bytes = snapshot.encode()?;
        write_atomic(&self.path, &bytes)?;
        tracing::debug!("Saved wallet snapshot to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");

        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_write_atomic_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("slate.json");
        write_atomic(&path, b"{}").unwrap();
        assert!(path.exists());
    }
}
