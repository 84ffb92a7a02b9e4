use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

/// In-process mutex per key, held across a check-then-write sequence.
///
/// Entries nobody holds are pruned on every acquisition, so the map only
/// grows with the number of keys in use at the same time.
pub(crate) struct KeyedLocks<K> {
    locks: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub(crate) fn for_key(&self, key: &K) -> Arc<Mutex<()>> {
        let mut guard = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        guard.retain(|_, lock| Arc::strong_count(lock) > 1);
        guard
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run `critical` while holding the lock for `key`.
    pub(crate) fn with<T>(&self, key: &K, critical: impl FnOnce() -> T) -> T {
        let lock = self.for_key(key);
        let _held = lock.lock().unwrap_or_else(PoisonError::into_inner);
        critical()
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
