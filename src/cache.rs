//! On-disk JSON cache for geocoding and archive responses.
//!
//! One file per entry, named by the caller. Freshness is judged from the
//! file's modification time; entries without a max age never expire.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Cache rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Read an entry; `Ok(None)` when missing, stale, or undecodable
    pub fn read<T: DeserializeOwned>(&self, name: &str, max_age: Option<Duration>) -> Result<Option<T>> {
        let path = self.path_for(name);

        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if let Some(max_age) = max_age {
            let modified = metadata.modified()?;
            // mtime in the future counts as fresh
            let age = SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO);
            if age > max_age {
                tracing::debug!("Cache entry {} is stale ({:?} old)", name, age);
                return Ok(None);
            }
        }

        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str(&contents) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache file {:?}: {}", path, e);
                Ok(None)
            }
        }
    }

    pub fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string(value)?;
        fs::write(self.path_for(name), contents)?;
        Ok(())
    }

    /// Delete every cached file; returns how many were removed
    pub fn flush(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }

        tracing::info!("Cache flushed ({} files removed from {:?})", removed, self.dir);
        Ok(removed)
    }
}
