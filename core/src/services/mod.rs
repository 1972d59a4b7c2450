//! Service probes
//!
//! Each probe performs one minimal round-trip against a live service:
//! create a uniquely named namespace, write once, read back or confirm, and
//! describe what happened in a one-line message. All six share the same
//! pipeline (see [`crate::harness::Harness::check`]) and differ only in the
//! client calls made by [`ServiceProbe::round_trip`].

pub mod error;
pub mod kafka;
pub mod minio;
pub mod mysql;
pub mod opensearch;
pub mod postgres;
pub mod valkey;

pub use error::ProbeError;
pub use kafka::KafkaProbe;
pub use minio::MinioProbe;
pub use mysql::MySqlProbe;
pub use opensearch::OpenSearchProbe;
pub use postgres::PostgresProbe;
pub use valkey::ValkeyProbe;

use async_trait::async_trait;
use uuid::Uuid;

use crate::env::EnvSource;

/// Static identity and gating policy of a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeDescriptor {
    /// Display name, e.g. "PostgreSQL"
    pub service: &'static str,
    /// Client library identifier shown next to the service
    pub client: &'static str,
    /// Environment flag that enables the check
    pub enable_flag: &'static str,
    /// Whether the check runs when the flag is unset
    pub default_enabled: bool,
}

/// Where a probe connects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port`
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `http://host:port`
    #[must_use]
    pub fn http_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// A single service check strategy
#[async_trait]
pub trait ServiceProbe: Send + Sync {
    fn descriptor(&self) -> ProbeDescriptor;

    /// Host and port used for the reachability gate and the client
    fn endpoint(&self) -> Endpoint;

    /// Connect, create a namespace, write, read back.
    ///
    /// Returns the PASS detail. Every connection opened here must be released
    /// before returning, on success and on error.
    async fn round_trip(&self) -> Result<String, ProbeError>;
}

/// The six probes in reporting order, configured from `env`
pub fn default_probes(env: &dyn EnvSource) -> Vec<Box<dyn ServiceProbe>> {
    vec![
        Box::new(PostgresProbe::from_env(env)),
        Box::new(MySqlProbe::from_env(env)),
        Box::new(ValkeyProbe::from_env(env)),
        Box::new(KafkaProbe::from_env(env)),
        Box::new(OpenSearchProbe::from_env(env)),
        Box::new(MinioProbe::from_env(env)),
    ]
}

/// `<prefix>-<uuid v4>`, fresh on every call
pub(crate) fn unique_name(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}
