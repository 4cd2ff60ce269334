//! Consistent hashing ring
//!
//! Each physical node occupies `replicas_per_node` virtual positions on a u64
//! ring. A key belongs to the first position at or after its own hash,
//! wrapping around, so topology changes only move the keys between the
//! changed positions and their predecessors.

use crate::common::hash::{key_position, vnode_position};
use crate::common::{Error, Result};
use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct RingState {
    /// Virtual node positions: ring position -> physical node.
    vnodes: BTreeMap<u64, String>,
    /// Physical nodes currently on the ring.
    nodes: HashSet<String>,
}

/// Consistent hashing ring with virtual replicas per physical node.
///
/// Topology mutations take the write lock, so concurrent lookups see either
/// the old ring or the fully updated one, never a partial insert.
#[derive(Debug)]
pub struct HashRing {
    inner: RwLock<RingState>,
    replicas_per_node: u32,
}

impl HashRing {
    /// Build a ring from an initial node set.
    pub fn new(nodes: &[String], replicas_per_node: u32) -> Self {
        let ring = Self {
            inner: RwLock::new(RingState::default()),
            replicas_per_node,
        };
        for node in nodes {
            ring.add_node(node);
        }
        ring
    }

    /// Insert a node's virtual positions. Positions of other nodes are
    /// untouched. Position collisions resolve last-write-wins; with 64-bit
    /// hashed positions this is accepted skew, not corrected.
    pub fn add_node(&self, node: &str) {
        let mut state = self.inner.write().unwrap();
        for i in 0..self.replicas_per_node {
            state.vnodes.insert(vnode_position(node, i), node.to_string());
        }
        state.nodes.insert(node.to_string());
        debug!(node, replicas = self.replicas_per_node, "added node to ring");
    }

    /// Remove all of a node's virtual positions. Keys it owned reassign to
    /// their new ring successor.
    pub fn remove_node(&self, node: &str) {
        let mut state = self.inner.write().unwrap();
        if state.nodes.remove(node) {
            for i in 0..self.replicas_per_node {
                let pos = vnode_position(node, i);
                // A collided position may now belong to another node.
                if state.vnodes.get(&pos).map(String::as_str) == Some(node) {
                    state.vnodes.remove(&pos);
                }
            }
            debug!(node, "removed node from ring");
        }
    }

    /// The node owning a key: smallest ring position >= hash(key), wrapping
    /// to the smallest position overall.
    pub fn owner(&self, key: &str) -> Result<String> {
        let state = self.inner.read().unwrap();
        let pos = key_position(key);

        state
            .vnodes
            .range(pos..)
            .next()
            .or_else(|| state.vnodes.iter().next())
            .map(|(_, node)| node.clone())
            .ok_or(Error::EmptyRing)
    }

    /// Walk clockwise from the owner, collecting `count` distinct physical
    /// nodes (repeated virtual positions of a collected node are skipped).
    /// `owner(key)` is always the first element.
    pub fn replica_owners(&self, key: &str, count: usize) -> Result<Vec<String>> {
        let state = self.inner.read().unwrap();
        if state.vnodes.is_empty() {
            return Err(Error::EmptyRing);
        }
        if state.nodes.len() < count {
            return Err(Error::InsufficientNodes {
                needed: count,
                available: state.nodes.len(),
            });
        }

        let pos = key_position(key);
        let mut owners: Vec<String> = Vec::with_capacity(count);

        let after = state.vnodes.range(pos..);
        let before = state.vnodes.range(..pos);
        for (_, node) in after.chain(before) {
            if !owners.iter().any(|n| n == node) {
                owners.push(node.clone());
                if owners.len() == count {
                    break;
                }
            }
        }

        Ok(owners)
    }

    /// Physical nodes currently on the ring.
    pub fn nodes(&self) -> Vec<String> {
        self.inner.read().unwrap().nodes.iter().cloned().collect()
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().unwrap().nodes.len()
    }

    pub fn vnode_count(&self) -> usize {
        self.inner.read().unwrap().vnodes.len()
    }
}
