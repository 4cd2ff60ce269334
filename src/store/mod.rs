//! Transactional, versioned key-value storage

pub mod txn;
pub mod versioned;

pub use txn::{Operation, TransactionLog, TxnId, TxnState};
pub use versioned::VersionedStore;
