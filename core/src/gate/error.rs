//! Error types for reachability probing

use std::time::Duration;
use thiserror::Error;

/// Errors from a single dial attempt
#[derive(Error, Debug)]
pub enum GateError {
    /// The dial attempt timed out
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// TCP connection (or name resolution) failed
    #[error("tcp connection failed: {0}")]
    Tcp(#[from] std::io::Error),
}
