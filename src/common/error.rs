//! Error types for shardkv

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Transaction Errors ===
    #[error("unknown transaction: {0}")]
    UnknownTransaction(String),

    #[error("transaction {id} is {state}, expected open")]
    InvalidState { id: String, state: String },

    #[error("malformed operation: {0}")]
    MalformedOperation(String),

    // === Placement Errors ===
    #[error("hash ring is empty")]
    EmptyRing,

    #[error("insufficient nodes: need {needed}, have {available}")]
    InsufficientNodes { needed: usize, available: usize },

    // === Replication Errors ===
    #[error("quorum not reached: need {needed}, got {delivered}")]
    QuorumNotReached {
        needed: usize,
        delivered: usize,
        /// Per-target outcomes, in target order, so the caller can decide
        /// on retry or compensating action.
        outcomes: Vec<crate::replication::DeliveryOutcome>,
    },

    // === Config Errors ===
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // === Generic ===
    #[error("internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Is this a retryable error?
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::QuorumNotReached { .. } | Error::EmptyRing)
    }
}

// Implement From for common error types
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Other(e.to_string())
    }
}
