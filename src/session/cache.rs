//! TTL cache collaborator for the orchestration layer.
//!
//! Replaces ad-hoc process-wide lookup caches (user profile, conversation
//! rows) with an injected object that has an explicit lifecycle: created at
//! startup, entries expire after their TTL, `clear()` at shutdown.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub trait TtlCache<K, V>: Send + Sync {
    /// Live value for `key`; expired entries are never returned.
    fn get(&self, key: &K) -> Option<V>;
    fn set(&self, key: K, value: V, ttl: Duration);
    fn invalidate(&self, key: &K) -> bool;
    fn clear(&self);
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

pub struct MemoryTtlCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> Default for MemoryTtlCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V> MemoryTtlCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> TtlCache<K, V> for MemoryTtlCache<K, V>
where
    K: Eq + Hash + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(e) if e.expires_at > Instant::now() => Some(e.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: K, value: V, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, Entry { value, expires_at });
    }

    fn invalidate(&self, key: &K) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key)
            .is_some()
    }

    fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        tracing::debug!("[Cache] Cleared {} entries", entries.len());
        entries.clear();
    }
}
