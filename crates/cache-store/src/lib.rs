//! TTL-bounded key/value cache persistence for the Herald console.
//!
//! Values are stored one file per key as a JSON envelope carrying the value
//! and its write timestamp. A read past the TTL is a miss and evicts the
//! entry. Caching here is an optimization, never a correctness requirement:
//! write failures are logged and swallowed, corrupt entries read as misses.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use cache_store::CacheStore;
//!
//! # fn example() -> Result<(), cache_store::StoreError> {
//! let store = CacheStore::open("cache", Duration::from_secs(30 * 60))?;
//! store.write("chat_members", &vec!["alice".to_string()]);
//!
//! let names: Option<Vec<String>> = store.read("chat_members");
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::StoreError;

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// On-disk envelope wrapping a cached value with its write time.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    value: T,
    /// Unix milliseconds at write time.
    timestamp: u64,
}

/// A directory of JSON envelope files with a shared TTL.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, ttl })
    }

    /// The store's TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read a cached value.
    ///
    /// Returns `None` when the entry is absent, unreadable, or older than
    /// the TTL. Expired entries are evicted.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.read_at(key, now_ms())
    }

    /// Read a cached value against an explicit clock.
    pub fn read_at<T: DeserializeOwned>(&self, key: &str, now_ms: u64) -> Option<T> {
        let path = self.path_for(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    debug!(key = %key, error = %err, "Cache read failed");
                }
                return None;
            }
        };

        let envelope: Envelope<T> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(key = %key, error = %err, "Corrupt cache entry, treating as miss");
                return None;
            }
        };

        let ttl_ms = self.ttl.as_millis() as u64;
        if now_ms.saturating_sub(envelope.timestamp) > ttl_ms {
            debug!(key = %key, "Cache entry expired, evicting");
            self.evict(key);
            return None;
        }

        Some(envelope.value)
    }

    /// Write a cached value, overwriting any previous entry.
    ///
    /// Failures are logged and swallowed.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        self.write_at(key, value, now_ms());
    }

    /// Write a cached value with an explicit timestamp.
    pub fn write_at<T: Serialize>(&self, key: &str, value: &T, now_ms: u64) {
        let envelope = Envelope {
            value,
            timestamp: now_ms,
        };
        let raw = match serde_json::to_string(&envelope) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key = %key, error = %err, "Cache serialization failed, skipping write");
                return;
            }
        };
        if let Err(err) = std::fs::write(self.path_for(key), raw) {
            warn!(key = %key, error = %err, "Cache write failed, skipping");
        }
    }

    /// Remove an entry. Missing entries are fine.
    pub fn evict(&self, key: &str) {
        if let Err(err) = std::fs::remove_file(self.path_for(key)) {
            if err.kind() != std::io::ErrorKind::NotFound {
                debug!(key = %key, error = %err, "Cache evict failed");
            }
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
