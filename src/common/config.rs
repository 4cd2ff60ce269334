//! Configuration for shardkv components

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cluster configuration
///
/// Values only; the behavior they feed (ring construction, quorum checks)
/// lives in `placement` and `replication`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Physical nodes in the cluster
    pub nodes: Vec<String>,

    /// Virtual positions per physical node on the hash ring
    #[serde(default = "default_replicas_per_node")]
    pub replicas_per_node: u32,

    /// Write quorum: minimum successful deliveries for a replicated write
    #[serde(default = "default_write_quorum")]
    pub write_quorum: usize,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_replicas_per_node() -> u32 {
    3
}
fn default_write_quorum() -> usize {
    1
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            replicas_per_node: default_replicas_per_node(),
            write_quorum: default_write_quorum(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        let parsed: Self = cfg
            .try_deserialize()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// Check the value constraints: at least one node, replica factor >= 1,
    /// and 1 <= write_quorum <= node count.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::InvalidConfig("at least one node required".into()));
        }
        if self.replicas_per_node == 0 {
            return Err(Error::InvalidConfig(
                "replicas_per_node must be >= 1".into(),
            ));
        }
        if self.write_quorum == 0 {
            return Err(Error::InvalidConfig("write_quorum must be >= 1".into()));
        }
        if self.write_quorum > self.nodes.len() {
            return Err(Error::InvalidConfig(format!(
                "write_quorum {} exceeds node count {}",
                self.write_quorum,
                self.nodes.len()
            )));
        }
        Ok(())
    }
}
