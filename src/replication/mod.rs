//! Replication of committed writes to their replica set

pub mod coordinator;
pub mod transport;

pub use coordinator::{DeliveryOutcome, DeliveryStatus, ReplicationCoordinator};
pub use transport::{DeliveryError, InMemoryTransport, Transport};
