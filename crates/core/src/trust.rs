// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content-trust store
//!
//! A mapping from canonical pipeline path to the SHA-256 of the file's
//! bytes, persisted as pretty-printed JSON under the user's PipeForge
//! directory. Trust is advisory: a corrupt store reads as empty and
//! persistence failures are logged and swallowed, never surfaced.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the persisted store.
const STORE_FILE: &str = "trusted-hashes.json";

/// Name of the per-user configuration directory.
const CONFIG_DIR: &str = ".pipeforge";

/// Errors from trust operations.
///
/// Only hashing the target file can fail; the store file itself never
/// produces errors.
#[derive(Debug, Error)]
pub enum TrustError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine home directory")]
    NoHomeDir,
}

/// Result of comparing a file's current hash with the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustStatus {
    /// Never seen before
    New,
    /// Contents match the stored hash
    Trusted,
    /// Contents differ from the stored hash
    Modified { previous: String },
}

/// Outcome of a trust check; always carries the current hash.
#[derive(Debug, Clone)]
pub struct TrustCheck {
    pub status: TrustStatus,
    pub current: String,
}

/// Content-addressed record of previously-seen pipeline files.
pub struct TrustStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl TrustStore {
    /// Open a store persisted under `dir`.
    ///
    /// A missing, corrupt or unreadable store file is treated as empty.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let path = dir.into().join(STORE_FILE);
        let entries = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "trust store corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    /// Open the per-user default store (`~/.pipeforge/trusted-hashes.json`).
    pub fn open_default() -> Result<Self, TrustError> {
        let home = dirs::home_dir().ok_or(TrustError::NoHomeDir)?;
        Ok(Self::open(home.join(CONFIG_DIR)))
    }

    /// Compare `path`'s current contents against the stored hash.
    pub fn check(&self, path: &Path) -> Result<TrustCheck, TrustError> {
        let current = hash_file(path)?;
        let key = canonical_key(path);

        let status = match self.entries.get(&key) {
            None => TrustStatus::New,
            Some(stored) if *stored == current => TrustStatus::Trusted,
            Some(stored) => TrustStatus::Modified {
                previous: stored.clone(),
            },
        };

        Ok(TrustCheck { status, current })
    }

    /// Record `path` as trusted with `hash` (computed when `None`) and
    /// persist. Returns the recorded hash.
    pub fn trust(&mut self, path: &Path, hash: Option<String>) -> Result<String, TrustError> {
        let hash = match hash {
            Some(h) => h,
            None => hash_file(path)?,
        };
        self.entries.insert(canonical_key(path), hash.clone());
        self.persist();
        Ok(hash)
    }

    fn persist(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize trust store");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "could not create trust store directory");
                return;
            }
        }
        if let Err(e) = std::fs::write(&self.path, json) {
            tracing::warn!(path = %self.path.display(), error = %e, "could not persist trust store");
        }
    }
}

/// Lowercase hex SHA-256 of the file's bytes.
pub fn hash_file(path: &Path) -> Result<String, TrustError> {
    let bytes = std::fs::read(path).map_err(|e| TrustError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// Canonical absolute form of the path used as the store key.
fn canonical_key(path: &Path) -> String {
    std::fs::canonicalize(path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| crate::paths::normalize(&path.display().to_string(), None))
}

#[cfg(test)]
#[path = "trust_tests.rs"]
mod tests;
