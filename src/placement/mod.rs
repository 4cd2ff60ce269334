//! Key-to-node placement via consistent hashing

pub mod ring;

pub use ring::HashRing;
