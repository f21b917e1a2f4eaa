//! Working dataset file.
//!
//! The store is the only persistence in the system: a single CSV file that is
//! loaded at startup and overwritten whenever an uploaded dataset has been
//! accepted. Writes go to a sibling temp file followed by a rename so a crash
//! never leaves a truncated dataset behind.

pub mod checksum;

pub use checksum::calculate_checksum;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

/// Location of the working dataset on disk.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the raw bytes of the working dataset.
    pub fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    /// Replace the working dataset with `bytes`.
    pub fn persist(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.tmp_path();
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "Working dataset persisted");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "dataset.csv".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
