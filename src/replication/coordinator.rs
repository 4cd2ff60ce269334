//! Replication coordinator: fans a committed write out to its replica set
//! and reports per-node outcomes against a write quorum.
//!
//! No retry happens here. A failed delivery is reported, not retried; retry
//! and compensating action are the caller's concern.

use crate::common::{Error, Result};
use crate::replication::transport::Transport;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    Failed(String),
}

/// Per-node replication outcome, in target order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub node: String,
    pub status: DeliveryStatus,
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        self.status == DeliveryStatus::Delivered
    }
}

/// Coordinates replica writes through a pluggable [`Transport`].
///
/// Generic over the transport for testability, same as the lookup path is
/// generic over the ring: real deployments plug in a network client, tests
/// plug in an in-memory or failing one.
#[derive(Debug)]
pub struct ReplicationCoordinator<T: Transport> {
    transport: Arc<T>,
    write_quorum: usize,
}

impl<T: Transport> ReplicationCoordinator<T> {
    pub fn new(transport: Arc<T>, write_quorum: usize) -> Self {
        Self {
            transport,
            write_quorum,
        }
    }

    pub fn write_quorum(&self) -> usize {
        self.write_quorum
    }

    /// Deliver `(key, value)` to every target once, preserving target order
    /// in the outcome list.
    ///
    /// Succeeds iff at least `write_quorum` deliveries succeed; otherwise
    /// fails with `QuorumNotReached` carrying the full partial outcome list.
    pub async fn replicate(
        &self,
        key: &str,
        value: &str,
        targets: &[String],
    ) -> Result<Vec<DeliveryOutcome>> {
        let deliveries = targets.iter().map(|node| async move {
            match self.transport.deliver(node, key, value).await {
                Ok(()) => DeliveryOutcome {
                    node: node.clone(),
                    status: DeliveryStatus::Delivered,
                },
                Err(e) => {
                    warn!(node = %node, key, error = %e, "replica delivery failed");
                    DeliveryOutcome {
                        node: node.clone(),
                        status: DeliveryStatus::Failed(e.to_string()),
                    }
                }
            }
        });

        // join_all preserves input order, so outcomes line up with targets.
        let outcomes: Vec<DeliveryOutcome> = join_all(deliveries).await;
        let delivered = outcomes.iter().filter(|o| o.is_delivered()).count();

        if delivered < self.write_quorum {
            return Err(Error::QuorumNotReached {
                needed: self.write_quorum,
                delivered,
                outcomes,
            });
        }

        debug!(key, delivered, targets = targets.len(), "replication complete");
        Ok(outcomes)
    }
}
