//! Abstraction over per-node replica delivery.
//!
//! The coordinator only defines bookkeeping; this trait is the one seam
//! where a real network client plugs in. Timeouts and cancellation belong to
//! the implementation behind it.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("delivery failed: {0}")]
    Failed(String),

    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("timeout")]
    Timeout,
}

/// Transport for replica delivery.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Deliver one key-value write to one node.
    async fn deliver(&self, node: &str, key: &str, value: &str) -> Result<(), DeliveryError>;
}

/// Loopback transport holding one in-memory map per node.
///
/// Serves single-process deployments and tests; nodes can be marked down to
/// inject delivery failures.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    replicas: Mutex<HashMap<String, HashMap<String, String>>>,
    down: Mutex<HashSet<String>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a node as unreachable; subsequent deliveries to it fail.
    pub fn mark_down(&self, node: &str) {
        self.down.lock().unwrap().insert(node.to_string());
    }

    /// Bring a node back; subsequent deliveries to it succeed.
    pub fn mark_up(&self, node: &str) {
        self.down.lock().unwrap().remove(node);
    }

    /// Value delivered to a node for a key, if any.
    pub fn delivered(&self, node: &str, key: &str) -> Option<String> {
        self.replicas
            .lock()
            .unwrap()
            .get(node)
            .and_then(|m| m.get(key).cloned())
    }

    /// Number of keys delivered to a node.
    pub fn delivered_count(&self, node: &str) -> usize {
        self.replicas
            .lock()
            .unwrap()
            .get(node)
            .map(|m| m.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn deliver(&self, node: &str, key: &str, value: &str) -> Result<(), DeliveryError> {
        if self.down.lock().unwrap().contains(node) {
            return Err(DeliveryError::Unreachable(node.to_string()));
        }

        self.replicas
            .lock()
            .unwrap()
            .entry(node.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
