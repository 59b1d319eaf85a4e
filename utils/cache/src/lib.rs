//! Shared cache abstraction injected into resolvers.
//!
//! Entries are immutable snapshots, so implementations need no
//! coordination beyond their own storage; a miss or a failure simply sends
//! the caller back to the source of truth.

use lru::LruCache;
use sha1::Digest;
use sha1::Sha1;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::MutexGuard;
use thiserror::Error;

pub const DEFAULT_CAPACITY: usize = 4096;

#[derive(Debug, Error)]
pub enum CacheError {
    /// The backing store could not be reached
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be decoded
    #[error("Corrupt cache entry: {0}")]
    Corrupt(String),
}

/// Get/set cache without expiry semantics.
pub trait SharedCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;
}

/// Namespaced key with a SHA-1 digest of the raw identifier.
pub fn cache_key(namespace: &str, raw: &str) -> String {
    let digest = Sha1::digest(raw.as_bytes());
    let hex: String = digest.iter().map(|byte| format!("{byte:02x}")).collect();
    format!("{namespace}:{hex}")
}

/// Bounded in-process cache.
pub struct LruSharedCache {
    memory: Mutex<LruCache<String, Vec<u8>>>,
}

impl LruSharedCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            memory: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Vec<u8>>> {
        match self.memory.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for LruSharedCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SharedCache for LruSharedCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        self.lock().put(key.to_string(), value);
        Ok(())
    }
}

/// Cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

impl SharedCache for NoopCache {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: Vec<u8>) -> Result<(), CacheError> {
        Ok(())
    }
}
