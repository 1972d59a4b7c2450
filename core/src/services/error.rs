//! Error types for service probes
//!
//! Client errors keep their own text so the FAIL detail shows exactly what
//! the client library reported.

use std::time::Duration;
use thiserror::Error;

/// Errors that abort a probe's round-trip
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("{0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("{0}")]
    MySql(#[from] mysql_async::Error),

    #[error("{0}")]
    Redis(#[from] redis::RedisError),

    #[error("{0}")]
    Kafka(#[from] rskafka::client::error::Error),

    #[error("{0}")]
    OpenSearch(#[from] opensearch::Error),

    #[error("{0}")]
    ObjectStore(#[from] s3::error::S3Error),

    #[error("invalid credentials: {0}")]
    Credentials(#[from] s3::creds::error::CredentialsError),

    /// The service answered but the read-back did not match the write
    #[error("{0}")]
    Verification(String),

    /// The service answered with a non-success status
    #[error("failed to {operation}: {body}")]
    Rejected { operation: &'static str, body: String },

    #[error("operation timed out after {} ms", .0.as_millis())]
    Timeout(Duration),
}

impl ProbeError {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            ProbeError::Postgres(_) => "PROBE001",
            ProbeError::MySql(_) => "PROBE002",
            ProbeError::Redis(_) => "PROBE003",
            ProbeError::Kafka(_) => "PROBE004",
            ProbeError::OpenSearch(_) => "PROBE005",
            ProbeError::ObjectStore(_) | ProbeError::Credentials(_) => "PROBE006",
            ProbeError::Verification(_) => "PROBE007",
            ProbeError::Rejected { .. } => "PROBE008",
            ProbeError::Timeout(_) => "PROBE009",
        }
    }
}
