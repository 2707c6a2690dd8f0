use std::collections::HashSet;

use parking_lot::RwLock;

/// Set of keys currently held by the cache.
///
/// Pattern invalidation scans this set instead of the value store, so every
/// eviction path must call [`KeyTracker::untrack`].
#[derive(Debug, Default)]
pub struct KeyTracker {
    keys: RwLock<HashSet<String>>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the key was already tracked.
    pub fn track(&self, key: &str) -> bool {
        let mut keys = self.keys.write();
        if keys.contains(key) {
            return false;
        }
        keys.insert(key.to_string())
    }

    /// Runs `f` under the write lock. The cache pairs each value-store
    /// mutation with its track/untrack here so the two never drift apart.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut HashSet<String>) -> R) -> R {
        f(&mut self.keys.write())
    }

    pub fn untrack(&self, key: &str) -> bool {
        self.keys.write().remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.read().contains(key)
    }

    /// Copy of the tracked keys; the read lock is released before returning.
    pub fn snapshot(&self) -> Vec<String> {
        self.keys.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn track_is_idempotent() {
        let tracker = KeyTracker::new();
        assert!(tracker.track("user:1"));
        assert!(!tracker.track("user:1"));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn with_write_exposes_the_tracked_set() {
        let tracker = KeyTracker::new();
        tracker.track("user:1");

        let removed = tracker.with_write(|keys| {
            keys.insert("user:2".to_string());
            keys.remove("user:1")
        });

        assert!(removed);
        assert_eq!(tracker.snapshot(), vec!["user:2".to_string()]);
    }

    #[test]
    fn untrack_absent_key_is_noop() {
        let tracker = KeyTracker::new();
        assert!(!tracker.untrack("missing"));
        assert!(tracker.is_empty());
    }

    #[test]
    fn concurrent_track_and_untrack() {
        let tracker = Arc::new(KeyTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let key = format!("w{}:{}", worker, i);
                        tracker.track(&key);
                        let _ = tracker.snapshot();
                        if i % 2 == 0 {
                            tracker.untrack(&key);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.len(), 8 * 50);
        assert!(tracker.contains("w3:99"));
        assert!(!tracker.contains("w3:98"));
    }
}
