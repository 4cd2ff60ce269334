//! Common utilities and types shared across shardkv

pub mod config;
pub mod error;
pub mod hash;

pub use config::Config;
pub use error::{Error, Result};
pub use hash::{key_position, vnode_position};
