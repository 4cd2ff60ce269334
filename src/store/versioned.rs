//! Versioned in-memory key-value store
//!
//! Every write updates `current` and appends to that key's history; history
//! entries are never removed or reordered, so `search_history` returns the
//! full write order across the store's lifetime.

use crate::common::{Error, Result};
use crate::store::txn::Operation;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

/// Validate a key: non-empty, no whitespace or control characters.
///
/// Whitespace is excluded so the `"key value"` text form of an operation
/// stays round-trippable through `apply_logged`.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::MalformedOperation("key cannot be empty".into()));
    }
    if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::MalformedOperation(format!(
            "key contains invalid characters: {:?}",
            key
        )));
    }
    Ok(())
}

#[derive(Debug, Default)]
struct StoreInner {
    /// Latest value per key
    current: BTreeMap<String, String>,
    /// Append-only value history per key
    history: HashMap<String, Vec<String>>,
}

impl StoreInner {
    fn apply(&mut self, key: &str, value: &str) {
        self.current.insert(key.to_string(), value.to_string());
        self.history
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }
}

/// In-memory key-value store with per-key version history.
///
/// All methods take `&self`; a single `RwLock` makes each mutation an
/// indivisible unit while reads run concurrently.
#[derive(Debug, Default)]
pub struct VersionedStore {
    inner: RwLock<StoreInner>,
}

impl VersionedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a key-value pair. Overwrites `current` and appends to history.
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.inner.write().unwrap().apply(key, value);
        Ok(())
    }

    /// Latest value for a key, or `None` if never written.
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.read().unwrap().current.get(key).cloned()
    }

    /// Full append-ordered value history for a key. Empty if never written.
    pub fn search_history(&self, key: &str) -> Vec<String> {
        self.inner
            .read()
            .unwrap()
            .history
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Current values of every key with the given literal prefix, in key order.
    pub fn scan_by_prefix(&self, prefix: &str) -> Vec<String> {
        self.inner
            .read()
            .unwrap()
            .current
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Apply a serialized `"key value"` operation (log replay boundary).
    ///
    /// Exactly two whitespace-separated tokens are required.
    pub fn apply_logged(&self, raw: &str) -> Result<()> {
        let mut tokens = raw.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(key), Some(value), None) => self.put(key, value),
            _ => Err(Error::MalformedOperation(format!(
                "expected \"key value\", got {:?}",
                raw
            ))),
        }
    }

    /// Apply a batch of operations under one write-lock acquisition.
    ///
    /// This is the commit path's atomicity primitive: no reader observes a
    /// partially applied batch. Keys are validated when logged, so the apply
    /// loop itself cannot fail partway.
    pub(crate) fn apply_batch(&self, ops: &[Operation]) {
        let mut inner = self.inner.write().unwrap();
        for op in ops {
            inner.apply(&op.key, &op.value);
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get() {
        let store = VersionedStore::new();
        store.put("key1", "value1").unwrap();

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_overwrite_keeps_history() {
        let store = VersionedStore::new();
        store.put("key1", "v1").unwrap();
        store.put("key1", "v2").unwrap();
        store.put("key1", "v3").unwrap();

        assert_eq!(store.get("key1"), Some("v3".to_string()));
        assert_eq!(store.search_history("key1"), vec!["v1", "v2", "v3"]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_history_of_unknown_key_is_empty() {
        let store = VersionedStore::new();
        assert!(store.search_history("nope").is_empty());
    }

    #[test]
    fn test_scan_by_prefix() {
        let store = VersionedStore::new();
        store.put("user:1", "alice").unwrap();
        store.put("user:2", "bob").unwrap();
        store.put("order:1", "book").unwrap();

        assert_eq!(store.scan_by_prefix("user:"), vec!["alice", "bob"]);
        assert_eq!(store.scan_by_prefix("order:"), vec!["book"]);
        assert!(store.scan_by_prefix("session:").is_empty());
    }

    #[test]
    fn test_scan_empty_prefix_returns_all() {
        let store = VersionedStore::new();
        store.put("b", "2").unwrap();
        store.put("a", "1").unwrap();

        // Key-sorted order.
        assert_eq!(store.scan_by_prefix(""), vec!["1", "2"]);
    }

    #[test]
    fn test_apply_logged() {
        let store = VersionedStore::new();
        store.apply_logged("key1 value1").unwrap();
        assert_eq!(store.get("key1"), Some("value1".to_string()));
    }

    #[test]
    fn test_apply_logged_malformed() {
        let store = VersionedStore::new();

        for raw in ["", "key1", "key1 value1 extra"] {
            let err = store.apply_logged(raw).unwrap_err();
            assert!(matches!(err, Error::MalformedOperation(_)), "raw: {raw:?}");
        }
        // Nothing was applied.
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let store = VersionedStore::new();
        assert!(store.put("", "v").is_err());
        assert!(store.put("has space", "v").is_err());
        assert!(store.put("has\ttab", "v").is_err());
    }
}
