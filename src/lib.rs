//! # shardkv
//!
//! Single-node core for a sharded, replicated key-value store:
//! - Versioned in-memory storage with append-only per-key history
//! - Transactions with atomic commit and rollback
//! - Consistent hashing with virtual nodes for key placement
//! - Write-quorum replication over a pluggable transport
//!
//! ## Architecture
//!
//! ```text
//!  caller
//!    │ begin / log / commit
//!    ▼
//!  ┌──────────────────┐  apply (atomic)  ┌──────────────────┐
//!  │  TransactionLog  ├─────────────────►│  VersionedStore  │
//!  └────────┬─────────┘                  │ current + history│
//!           │ committed ops              └──────────────────┘
//!           ▼
//!  ┌──────────────────┐  replica set     ┌──────────────────────────┐
//!  │     HashRing     ├─────────────────►│  ReplicationCoordinator  │
//!  │ (virtual nodes)  │                  │  deliver × N, quorum W   │
//!  └──────────────────┘                  └──────────────────────────┘
//! ```
//!
//! Consensus, network transport, and durable persistence are collaborator
//! concerns; the only network seam is [`replication::Transport`].
//!
//! ## Usage
//!
//! ```
//! use shardkv::{HashRing, Operation, TransactionLog, VersionedStore};
//!
//! let store = VersionedStore::new();
//! let log = TransactionLog::new();
//!
//! let txn = log.begin();
//! log.log(txn, Operation::new("key1", "value1")).unwrap();
//! log.log(txn, Operation::new("key2", "value2")).unwrap();
//! log.commit(txn, &store).unwrap();
//!
//! assert_eq!(store.get("key1").as_deref(), Some("value1"));
//!
//! let nodes = vec!["node1".to_string(), "node2".to_string(), "node3".to_string()];
//! let ring = HashRing::new(&nodes, 3);
//! let owners = ring.replica_owners("key1", 3).unwrap();
//! assert_eq!(owners.len(), 3);
//! ```

pub mod common;
pub mod placement;
pub mod replication;
pub mod store;

// Re-export commonly used types
pub use common::{Config, Error, Result};
pub use placement::HashRing;
pub use replication::{
    DeliveryOutcome, DeliveryStatus, InMemoryTransport, ReplicationCoordinator, Transport,
};
pub use store::{Operation, TransactionLog, TxnId, TxnState, VersionedStore};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
