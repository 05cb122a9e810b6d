//! In-memory key-value store with serialized access
//!
//! Every operation runs under one process-wide mutex, so the history of
//! sets, gets and deletes is totally ordered by lock acquisition.

use parking_lot::Mutex;
use std::collections::HashMap;

/// Result of a [`Store::set`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// No entry existed for the key.
    Created,
    /// An existing entry was overwritten.
    Updated,
}

impl SetOutcome {
    pub fn is_created(self) -> bool {
        matches!(self, SetOutcome::Created)
    }
}

/// Trait defining the interface for key-value storage operations
pub trait Store: Send + Sync {
    /// Insert or overwrite the value for `key`
    fn set(&self, key: String, value: String) -> SetOutcome;

    /// Get a copy of the current value for `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Remove `key`, returning whether it was present
    fn delete(&self, key: &str) -> bool;

    /// Number of stored entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutex-guarded in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn set(&self, key: String, value: String) -> SetOutcome {
        let mut data = self.data.lock();
        match data.insert(key, value) {
            None => SetOutcome::Created,
            Some(_) => SetOutcome::Updated,
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.data.lock().get(key).cloned()
    }

    fn delete(&self, key: &str) -> bool {
        self.data.lock().remove(key).is_some()
    }

    fn len(&self) -> usize {
        self.data.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_memory_store_basic_operations() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        // Test set and get
        assert_eq!(
            store.set("key1".to_string(), "value1".to_string()),
            SetOutcome::Created
        );
        assert_eq!(store.get("key1"), Some("value1".to_string()));

        // Test delete
        assert!(store.delete("key1"));
        assert!(!store.delete("key1")); // Already deleted
        assert_eq!(store.get("key1"), None);
    }

    #[test]
    fn test_overwrite_reports_updated() {
        let store = MemoryStore::new();
        assert!(store.set("k".to_string(), "v1".to_string()).is_created());
        assert_eq!(
            store.set("k".to_string(), "v2".to_string()),
            SetOutcome::Updated
        );
        assert_eq!(store.get("k"), Some("v2".to_string()));
        assert_eq!(store.len(), 1);

        // Same value again is still an overwrite
        assert_eq!(
            store.set("k".to_string(), "v2".to_string()),
            SetOutcome::Updated
        );
    }

    #[test]
    fn test_empty_key_and_value_are_accepted() {
        let store = MemoryStore::new();
        assert!(store.set(String::new(), String::new()).is_created());
        assert_eq!(store.get(""), Some(String::new()));
    }

    #[test]
    fn test_delete_absent_key_leaves_store_unchanged() {
        let store = MemoryStore::new();
        store.set("present".to_string(), "v".to_string());

        assert!(!store.delete("absent"));
        assert_eq!(store.get("absent"), None);
        assert_eq!(store.get("present"), Some("v".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_access() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = vec![];

        for i in 0..10 {
            let store_clone = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let key = format!("key{}", i);
                let value = format!("value{}", i);
                store_clone.set(key.clone(), value.clone());
                assert_eq!(store_clone.get(&key), Some(value));
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 10);
    }

    #[test]
    fn test_concurrent_sets_on_one_key() {
        let store = Arc::new(MemoryStore::new());
        let values: Vec<String> = (0..32).map(|i| format!("value-{}-{}", i, "x".repeat(i))).collect();

        let handles: Vec<_> = values
            .iter()
            .cloned()
            .map(|value| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.set("shared".to_string(), value))
            })
            .collect();

        let created = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|outcome| outcome.is_created())
            .count();

        // Exactly one writer saw the key absent
        assert_eq!(created, 1);
        let last = store.get("shared").unwrap();
        assert!(values.contains(&last));
        assert_eq!(store.len(), 1);
    }
}
