//! Response cache module
//!
//! This module provides an expiring key/value store for raw response bodies.
//! Entries live in memory and are persisted to a single JSON snapshot file
//! only when the caller asks for it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, SystemTime};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Lifetime of an entry stored without an explicit TTL (one week)
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Minimum time between two in-memory sweeps of expired entries (one hour)
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Format version written into every snapshot file
const SNAPSHOT_VERSION: u32 = 2;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to determine cache directory location
    #[error("Failed to determine cache directory location")]
    CacheDirectoryNotFound,

    /// Failed to create or access cache directory
    #[error("Failed to create cache directory at {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read the snapshot file
    #[error("Failed to read cache file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the snapshot file
    #[error("Failed to write cache file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The snapshot file exists but is not a valid snapshot
    #[error("Failed to deserialize cache file {path}: {source}")]
    DeserializationFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The snapshot file was written by an incompatible version
    #[error("Unsupported cache file version {version} in {path}")]
    UnsupportedVersion { path: PathBuf, version: u32 },

    /// Failed to serialize the snapshot
    #[error("Failed to serialize data: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// A single cached value together with its expiry window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CacheEntry {
    #[serde(with = "base64_bytes")]
    value: Vec<u8>,
    stored_at: SystemTime,
    ttl: Duration,
}

/// Stores byte values as base64 strings instead of JSON number arrays
mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

impl CacheEntry {
    fn is_expired(&self, now: SystemTime) -> bool {
        match self.stored_at.checked_add(self.ttl) {
            Some(expires_at) => now > expires_at,
            // Out of SystemTime range, effectively never expires
            None => false,
        }
    }
}

/// Snapshot as written to disk, borrowing from the live map
#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    entries: HashMap<&'a str, &'a CacheEntry>,
}

/// Snapshot as read back from disk
#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    last_sweep: SystemTime,
}

/// An expiring, persistable store of response bodies
///
/// Keys are canonical request URLs and values are the raw bytes returned by
/// the service. Reads and writes synchronize internally, so a store can be
/// shared behind an `Arc` by several fetchers. Loading and saving operate on
/// the whole snapshot and should not race with other mutations.
#[derive(Debug)]
pub struct CacheStore {
    inner: RwLock<Inner>,
    default_ttl: Duration,
    cleanup_interval: Duration,
    /// File used by [`CacheStore::save`], set when opened from disk
    backing_file: Option<PathBuf>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CLEANUP_INTERVAL)
    }
}

impl CacheStore {
    /// Creates an empty in-memory store
    ///
    /// # Arguments
    ///
    /// * `default_ttl` - Lifetime applied to entries set without a TTL
    /// * `cleanup_interval` - Minimum time between sweeps of expired entries
    pub fn new(default_ttl: Duration, cleanup_interval: Duration) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                last_sweep: SystemTime::now(),
            }),
            default_ttl,
            cleanup_interval,
            backing_file: None,
        }
    }

    /// Opens a store backed by the snapshot file at `path`
    ///
    /// The store uses the default TTL and cleanup interval. An absent file is
    /// not an error, the store simply starts empty. A file that exists but
    /// cannot be read or decoded is reported as an error.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let cache = CacheStore::open("/tmp/tvmaze.json")?;
    /// // ... fetch things ...
    /// cache.save()?;
    /// ```
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let mut store = Self::default();
        store.load_file(&path)?;
        store.backing_file = Some(path);
        Ok(store)
    }

    /// Returns the snapshot file this store was opened from, if any
    pub fn backing_file(&self) -> Option<&Path> {
        self.backing_file.as_deref()
    }

    /// Returns the TTL applied to entries stored without an explicit one
    ///
    /// This is also the TTL given to every response the fetcher stores.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Looks up the live value stored under `key`
    ///
    /// Returns `None` when the key was never set or its entry has expired.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.get_at(key, SystemTime::now())
    }

    /// Stores `value` under `key`, starting a fresh expiry window
    ///
    /// A `ttl` of `None` or zero applies the store's default TTL.
    pub fn set(&self, key: impl Into<String>, value: Vec<u8>, ttl: Option<Duration>) {
        self.set_at(key.into(), value, ttl, SystemTime::now());
    }

    /// Removes the entry for `key`, returning whether one was present
    pub fn delete(&self, key: &str) -> bool {
        self.write().entries.remove(key).is_some()
    }

    /// Removes every expired entry and returns how many were dropped
    pub fn delete_expired(&self) -> usize {
        let now = SystemTime::now();
        let mut inner = self.write();
        let removed = sweep(&mut inner.entries, now);
        inner.last_sweep = now;
        removed
    }

    /// Removes all entries
    pub fn clear(&self) {
        self.write().entries.clear();
    }

    /// Number of stored entries, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// Replaces the in-memory contents with the snapshot stored at `path`
    ///
    /// A missing file is treated as an empty snapshot. Entries that expired
    /// while on disk are dropped.
    pub fn load_file(&self, path: &Path) -> Result<(), CacheError> {
        let entries = match fs::read_to_string(path) {
            Ok(content) => {
                let snapshot: Snapshot = serde_json::from_str(&content).map_err(|e| {
                    CacheError::DeserializationFailed {
                        path: path.to_path_buf(),
                        source: e,
                    }
                })?;

                if snapshot.version != SNAPSHOT_VERSION {
                    return Err(CacheError::UnsupportedVersion {
                        path: path.to_path_buf(),
                        version: snapshot.version,
                    });
                }

                snapshot.entries
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no cache file, starting empty");
                HashMap::new()
            }
            Err(e) => {
                return Err(CacheError::ReadFailed {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let now = SystemTime::now();
        let mut inner = self.write();
        inner.entries = entries;
        let dropped = sweep(&mut inner.entries, now);
        inner.last_sweep = now;

        tracing::debug!(
            path = %path.display(),
            entries = inner.entries.len(),
            dropped,
            "loaded cache file"
        );
        Ok(())
    }

    /// Writes the complete snapshot to `path`, replacing any existing file
    ///
    /// Expired entries are left out. The parent directory must exist. The
    /// snapshot is written to a temporary file next to `path` and renamed
    /// into place, so a failed save leaves the previous file intact.
    pub fn save_file(&self, path: &Path) -> Result<(), CacheError> {
        let content = {
            let now = SystemTime::now();
            let inner = self.read();
            let snapshot = SnapshotRef {
                version: SNAPSHOT_VERSION,
                entries: inner
                    .entries
                    .iter()
                    .filter(|(_, entry)| !entry.is_expired(now))
                    .map(|(key, entry)| (key.as_str(), entry))
                    .collect(),
            };
            serde_json::to_string(&snapshot)?
        };

        write_atomically(path, |file| file.write_all(content.as_bytes()))?;

        tracing::debug!(path = %path.display(), "saved cache file");
        Ok(())
    }

    /// Writes the snapshot back to the file the store was opened from
    ///
    /// Stores created in memory have no backing file and nothing to write.
    pub fn save(&self) -> Result<(), CacheError> {
        match &self.backing_file {
            Some(path) => self.save_file(path),
            None => Ok(()),
        }
    }

    fn get_at(&self, key: &str, now: SystemTime) -> Option<Vec<u8>> {
        let inner = self.read();
        inner
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone())
    }

    fn set_at(&self, key: String, value: Vec<u8>, ttl: Option<Duration>, now: SystemTime) {
        let ttl = match ttl {
            Some(ttl) if !ttl.is_zero() => ttl,
            _ => self.default_ttl,
        };

        let mut inner = self.write();

        let sweep_due = inner
            .last_sweep
            .checked_add(self.cleanup_interval)
            .is_some_and(|due| now >= due);
        if sweep_due {
            sweep(&mut inner.entries, now);
            inner.last_sweep = now;
        }

        inner.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
                ttl,
            },
        );
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Drops expired entries, returning how many were removed
fn sweep(entries: &mut HashMap<String, CacheEntry>, now: SystemTime) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));
    before - entries.len()
}

/// Replaces `path` with whatever `write` puts into a sibling temporary file
///
/// The temporary file is removed again if writing or renaming fails.
fn write_atomically<F>(path: &Path, write: F) -> Result<(), CacheError>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let write_failed = |source: io::Error| CacheError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(write_failed)?;
    write(temp.as_file_mut()).map_err(write_failed)?;
    temp.as_file().sync_all().map_err(write_failed)?;
    temp.persist(path).map_err(|e| write_failed(e.error))?;

    Ok(())
}

/// Returns the default location of the cache file
///
/// The file lives in the system's standard cache directory, which is created
/// if it does not exist yet.
pub fn default_cache_path() -> Result<PathBuf, CacheError> {
    let proj_dirs = directories::ProjectDirs::from("com", "tvmaze", "tvmaze_client")
        .ok_or(CacheError::CacheDirectoryNotFound)?;

    let cache_dir = proj_dirs.cache_dir();
    fs::create_dir_all(cache_dir).map_err(|e| CacheError::DirectoryCreationFailed {
        path: cache_dir.to_path_buf(),
        source: e,
    })?;

    Ok(cache_dir.join("responses.json"))
}
