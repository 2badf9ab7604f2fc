//! Profile store persisted as a single JSON file
//!
//! Provides a `CacheStore` that maps cache keys to normalized profiles. The
//! whole store lives in one versioned JSON document that is rewritten
//! atomically on every `put`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::Profile;

/// Version of the on-disk document layout
pub const STORE_VERSION: u32 = 1;

/// Errors raised while opening, reading or writing the store file
#[derive(Debug, Error)]
pub enum CacheStoreError {
    /// The store file exists but could not be read
    #[error("Failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store file could not be written
    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store file is not a valid store document
    #[error("Cache file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store file was written by an incompatible version
    #[error(
        "Cache file {path} has unsupported version {found} (expected {expected})",
        expected = STORE_VERSION
    )]
    UnsupportedVersion { path: PathBuf, found: u32 },

    /// A profile could not be serialized
    #[error("Failed to encode cache file: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A stored profile together with when it was stored
///
/// `stored_at` is informational only; entries never expire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the entry was written
    pub stored_at: DateTime<Utc>,
    /// The normalized profile
    pub profile: Profile,
}

/// On-disk document
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    entries: BTreeMap<String, CacheEntry>,
}

/// Only used to check the version before decoding entries
#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

/// Durable key to profile lookup backed by a single file
///
/// The store itself holds no open resources. Call [`CacheStore::open`] to
/// acquire a [`CacheSession`]; the session is released when dropped.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Path of the store file
    path: PathBuf,
}

impl CacheStore {
    /// Creates a store backed by the file at `path`
    ///
    /// Nothing is touched on disk until a session is opened.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquires a session over the store contents
    ///
    /// A missing file is an empty store. An unreadable, corrupt or
    /// incompatible file is an error.
    pub fn open(&self) -> Result<CacheSession<'_>, CacheStoreError> {
        let file = match fs::read_to_string(&self.path) {
            Ok(content) => self.decode(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => StoreFile {
                version: STORE_VERSION,
                entries: BTreeMap::new(),
            },
            Err(source) => {
                return Err(CacheStoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        tracing::debug!(
            path = %self.path.display(),
            entries = file.entries.len(),
            "opened profile cache"
        );

        Ok(CacheSession { store: self, file })
    }

    /// Reads a single profile, releasing the store afterwards
    pub fn get(&self, key: &str) -> Result<Option<Profile>, CacheStoreError> {
        let session = self.open()?;
        Ok(session.get(key).cloned())
    }

    /// Writes a single profile, releasing the store afterwards
    pub fn put(&self, key: &str, profile: &Profile) -> Result<(), CacheStoreError> {
        let mut session = self.open()?;
        session.put(key, profile.clone())
    }

    fn decode(&self, content: &str) -> Result<StoreFile, CacheStoreError> {
        let corrupt = |source| CacheStoreError::Corrupt {
            path: self.path.clone(),
            source,
        };

        let header: VersionHeader = serde_json::from_str(content).map_err(corrupt)?;
        if header.version != STORE_VERSION {
            return Err(CacheStoreError::UnsupportedVersion {
                path: self.path.clone(),
                found: header.version,
            });
        }

        serde_json::from_str(content).map_err(corrupt)
    }

    /// Writes the document to a sibling temp file, syncs it and renames it
    /// over the store file
    fn persist(&self, file: &StoreFile) -> Result<(), CacheStoreError> {
        let json = serde_json::to_string_pretty(file)?;
        let write_err = |source| CacheStoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let temp_path = self.temp_path();
        let result = write_synced(&temp_path, json.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path));

        if let Err(source) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(source));
        }

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Scoped access to an opened store
///
/// Reads are served from the contents loaded at open time. Every `put` is
/// persisted before it returns, so dropping a session never loses data.
#[derive(Debug)]
pub struct CacheSession<'a> {
    store: &'a CacheStore,
    file: StoreFile,
}

impl CacheSession<'_> {
    /// Returns the stored profile for `key`, if any
    pub fn get(&self, key: &str) -> Option<&Profile> {
        self.file.entries.get(key).map(|entry| &entry.profile)
    }

    /// Returns the full entry for `key`, including when it was stored
    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.file.entries.get(key)
    }

    /// Number of stored profiles
    pub fn len(&self) -> usize {
        self.file.entries.len()
    }

    /// Whether the store holds no profiles
    pub fn is_empty(&self) -> bool {
        self.file.entries.is_empty()
    }

    /// Stores `profile` under `key`, overwriting any previous value
    ///
    /// On failure the in-memory view is rolled back and the file on disk is
    /// left as it was.
    pub fn put(&mut self, key: &str, profile: Profile) -> Result<(), CacheStoreError> {
        let entry = CacheEntry {
            stored_at: Utc::now(),
            profile,
        };
        let previous = self.file.entries.insert(key.to_string(), entry);

        if let Err(e) = self.store.persist(&self.file) {
            match previous {
                Some(previous) => self.file.entries.insert(key.to_string(), previous),
                None => self.file.entries.remove(key),
            };
            return Err(e);
        }

        tracing::debug!(
            path = %self.store.path.display(),
            key,
            entries = self.file.entries.len(),
            "stored profile"
        );
        Ok(())
    }
}
