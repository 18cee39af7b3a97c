//! File-backed response cache.
//!
//! The backing file is a single JSON object mapping canonical request keys
//! to response values. Reads are forgiving (a cold or corrupt cache is an
//! empty cache); writes replace the whole file atomically and fail loudly.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::Error;

/// In-memory mirror of the cache file.
pub type CacheMap = BTreeMap<String, Value>;

/// Handle on the cache file. Owns the on-disk representation exclusively.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the backing file.
    ///
    /// Missing, unreadable or unparsable files all yield an empty mapping.
    pub fn load(&self) -> CacheMap {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no cache file, starting cold");
                return CacheMap::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cache file unreadable, starting cold");
                return CacheMap::new();
            }
        };

        match serde_json::from_str::<CacheMap>(&contents) {
            Ok(map) => {
                tracing::debug!(path = %self.path.display(), entries = map.len(), "loaded cache");
                map
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cache file corrupt, starting cold");
                CacheMap::new()
            }
        }
    }

    /// Serialize the full mapping and replace the backing file.
    ///
    /// The mapping is written to a temp file in the same directory and renamed
    /// over the target, so a concurrent `load` sees either the old or the new file.
    pub fn save(&self, map: &CacheMap) -> Result<(), Error> {
        let serialized = serde_json::to_vec(map)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let write_err = |source| Error::CacheWrite { path: self.path.clone(), source };

        std::fs::create_dir_all(dir).map_err(write_err)?;
        let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
        temp.write_all(&serialized).map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %self.path.display(), entries = map.len(), bytes = serialized.len(), "saved cache");
        Ok(())
    }
}
