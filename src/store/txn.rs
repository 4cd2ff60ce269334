//! Transaction management
//!
//! A transaction buffers operations in memory; nothing is visible to readers
//! of the store until `commit` applies the whole buffer as one unit.
//! `rollback` discards the buffer with no observable effect. Committed and
//! aborted transactions leave the live set and accept no further operations.

use crate::common::{Error, Result};
use crate::store::versioned::{validate_key, VersionedStore};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Opaque, globally unique transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxnId(Uuid);

impl TxnId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for TxnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A single key-value write buffered under a transaction.
///
/// Immutable once logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub key: String,
    pub value: String,
}

impl Operation {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Transaction lifecycle: Open -> Committed | Aborted, both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnState {
    Open,
    Committed,
    Aborted,
}

impl std::fmt::Display for TxnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxnState::Open => write!(f, "open"),
            TxnState::Committed => write!(f, "committed"),
            TxnState::Aborted => write!(f, "aborted"),
        }
    }
}

#[derive(Debug)]
struct Transaction {
    state: TxnState,
    operations: Vec<Operation>,
}

/// Buffers operations per transaction and applies them atomically on commit.
///
/// The live-transaction table sits behind a single `Mutex` that also covers
/// the commit apply loop, so commits against the same store never interleave.
#[derive(Debug, Default)]
pub struct TransactionLog {
    live: Mutex<HashMap<TxnId, Transaction>>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new transaction. Never fails.
    pub fn begin(&self) -> TxnId {
        let id = TxnId::new();
        self.live.lock().unwrap().insert(
            id,
            Transaction {
                state: TxnState::Open,
                operations: Vec::new(),
            },
        );
        tracing::debug!(txn = %id, "transaction started");
        id
    }

    /// Append an operation to an open transaction's buffer.
    ///
    /// Keys are validated here so the commit apply loop cannot fail partway.
    pub fn log(&self, id: TxnId, op: Operation) -> Result<()> {
        validate_key(&op.key)?;

        let mut live = self.live.lock().unwrap();
        let txn = live
            .get_mut(&id)
            .ok_or_else(|| Error::UnknownTransaction(id.to_string()))?;

        if txn.state != TxnState::Open {
            return Err(Error::InvalidState {
                id: id.to_string(),
                state: txn.state.to_string(),
            });
        }

        txn.operations.push(op);
        Ok(())
    }

    /// Apply all buffered operations to `store` in log order, as one unit.
    ///
    /// Returns the applied operations so the caller can hand them to
    /// replication. On failure the transaction stays open and the store is
    /// untouched.
    pub fn commit(&self, id: TxnId, store: &VersionedStore) -> Result<Vec<Operation>> {
        let mut live = self.live.lock().unwrap();

        let mut txn = live
            .remove(&id)
            .ok_or_else(|| Error::UnknownTransaction(id.to_string()))?;

        if txn.state != TxnState::Open {
            let state = txn.state;
            live.insert(id, txn);
            return Err(Error::InvalidState {
                id: id.to_string(),
                state: state.to_string(),
            });
        }

        // The table mutex is held across the apply, so concurrent commits
        // against the same store serialize here.
        store.apply_batch(&txn.operations);
        txn.state = TxnState::Committed;

        tracing::debug!(txn = %id, ops = txn.operations.len(), "transaction committed");
        Ok(txn.operations)
    }

    /// Discard an open transaction. No store mutation occurs, ever.
    ///
    /// A second rollback of the same id fails with `UnknownTransaction`.
    pub fn rollback(&self, id: TxnId) -> Result<()> {
        let mut txn = self
            .live
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or_else(|| Error::UnknownTransaction(id.to_string()))?;

        txn.state = TxnState::Aborted;
        tracing::debug!(txn = %id, discarded = txn.operations.len(), "transaction rolled back");
        Ok(())
    }

    /// Number of operations buffered under a live transaction.
    pub fn operation_count(&self, id: TxnId) -> Option<usize> {
        self.live.lock().unwrap().get(&id).map(|t| t.operations.len())
    }

    /// Is this transaction still open?
    pub fn is_open(&self, id: TxnId) -> bool {
        self.live.lock().unwrap().contains_key(&id)
    }

    /// Number of live transactions.
    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_log_commit() {
        let log = TransactionLog::new();
        let store = VersionedStore::new();

        let txn = log.begin();
        log.log(txn, Operation::new("key1", "value1")).unwrap();
        log.log(txn, Operation::new("key2", "value2")).unwrap();

        // Nothing visible before commit.
        assert_eq!(store.get("key1"), None);
        assert_eq!(log.operation_count(txn), Some(2));

        let applied = log.commit(txn, &store).unwrap();
        assert_eq!(applied.len(), 2);
        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.get("key2"), Some("value2".to_string()));
        assert!(!log.is_open(txn));
    }

    #[test]
    fn test_last_write_wins_within_transaction() {
        let log = TransactionLog::new();
        let store = VersionedStore::new();

        let txn = log.begin();
        log.log(txn, Operation::new("key1", "v1")).unwrap();
        log.log(txn, Operation::new("key1", "v2")).unwrap();
        log.commit(txn, &store).unwrap();

        assert_eq!(store.get("key1"), Some("v2".to_string()));
        // Both writes land in history, in log order.
        assert_eq!(store.search_history("key1"), vec!["v1", "v2"]);
    }

    #[test]
    fn test_rollback_leaves_store_untouched() {
        let log = TransactionLog::new();
        let store = VersionedStore::new();
        store.put("existing", "before").unwrap();

        let txn = log.begin();
        log.log(txn, Operation::new("existing", "after")).unwrap();
        log.log(txn, Operation::new("new-key", "value")).unwrap();
        log.rollback(txn).unwrap();

        assert_eq!(store.get("existing"), Some("before".to_string()));
        assert_eq!(store.search_history("existing"), vec!["before"]);
        assert_eq!(store.get("new-key"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_terminal_transactions_accept_nothing() {
        let log = TransactionLog::new();
        let store = VersionedStore::new();

        let committed = log.begin();
        log.commit(committed, &store).unwrap();
        assert!(matches!(
            log.log(committed, Operation::new("k", "v")).unwrap_err(),
            Error::UnknownTransaction(_)
        ));
        assert!(matches!(
            log.commit(committed, &store).unwrap_err(),
            Error::UnknownTransaction(_)
        ));

        let aborted = log.begin();
        log.rollback(aborted).unwrap();
        // Second rollback fails too.
        assert!(matches!(
            log.rollback(aborted).unwrap_err(),
            Error::UnknownTransaction(_)
        ));
    }

    #[test]
    fn test_unknown_transaction() {
        let log = TransactionLog::new();
        let store = VersionedStore::new();
        let other = TransactionLog::new();
        let foreign = other.begin();

        assert!(log.log(foreign, Operation::new("k", "v")).is_err());
        assert!(log.commit(foreign, &store).is_err());
        assert!(log.rollback(foreign).is_err());
    }

    #[test]
    fn test_log_rejects_invalid_key() {
        let log = TransactionLog::new();
        let txn = log.begin();

        let err = log.log(txn, Operation::new("bad key", "v")).unwrap_err();
        assert!(matches!(err, Error::MalformedOperation(_)));
        assert_eq!(log.operation_count(txn), Some(0));
    }

    #[test]
    fn test_transactions_are_independent() {
        let log = TransactionLog::new();
        let store = VersionedStore::new();

        let a = log.begin();
        let b = log.begin();
        assert_eq!(log.live_count(), 2);

        log.log(a, Operation::new("key1", "from-a")).unwrap();
        log.log(b, Operation::new("key2", "from-b")).unwrap();

        log.rollback(b).unwrap();
        log.commit(a, &store).unwrap();

        assert_eq!(store.get("key1"), Some("from-a".to_string()));
        assert_eq!(store.get("key2"), None);
        assert_eq!(log.live_count(), 0);
    }
}
