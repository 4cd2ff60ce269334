//! Hashing utilities for shardkv
//!
//! All ring positions come from BLAKE3 truncated to a little-endian u64, so
//! key-to-node assignments are reproducible across process restarts.

/// Ring position of a key.
pub fn key_position(key: &str) -> u64 {
    let hash = blake3::hash(key.as_bytes());
    u64::from_le_bytes(hash.as_bytes()[0..8].try_into().unwrap())
}

/// Ring position of a virtual node: blake3(node_id ++ replica_index).
///
/// Deterministic in (node id, replica index), so re-adding a node with the
/// same replica factor restores its exact positions.
pub fn vnode_position(node: &str, replica_index: u32) -> u64 {
    let mut input = Vec::with_capacity(node.len() + 4);
    input.extend_from_slice(node.as_bytes());
    input.extend_from_slice(&replica_index.to_le_bytes());
    let hash = blake3::hash(&input);
    u64::from_le_bytes(hash.as_bytes()[0..8].try_into().unwrap())
}
