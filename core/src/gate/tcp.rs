//! TCP reachability probing

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use super::{Dialer, GateError};

/// Single TCP dial against a host and port
///
/// The connection is closed as soon as it is established; only
/// connectability is tested. Name resolution happens inside the timeout.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    /// Target host to connect to
    host: String,
    /// Target port to connect to
    port: u16,
    /// Connection timeout
    timeout: Duration,
}

impl TcpProbe {
    /// Create a new TCP probe
    ///
    /// # Arguments
    ///
    /// * `host` - The host to connect to (e.g., "postgres", "127.0.0.1")
    /// * `port` - The port to connect to
    /// * `timeout` - Maximum time to wait for connection establishment
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Get the target address as a string
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Attempt one connection
    pub async fn check(&self) -> Result<(), GateError> {
        let address = self.address();
        debug!("TCP probe connecting to {}", address);

        match timeout(self.timeout, TcpStream::connect(&address)).await {
            Ok(Ok(_stream)) => {
                debug!("TCP probe to {} succeeded", address);
                Ok(())
            }
            Ok(Err(io_error)) => {
                debug!("TCP probe to {} failed: {}", address, io_error);
                Err(GateError::Tcp(io_error))
            }
            Err(_elapsed) => {
                debug!(
                    "TCP probe to {} timed out after {:?}",
                    address, self.timeout
                );
                Err(GateError::Timeout(self.timeout))
            }
        }
    }
}

/// [`Dialer`] backed by real TCP connections
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpDialer;

#[async_trait]
impl Dialer for TcpDialer {
    async fn dial(&self, host: &str, port: u16, timeout: Duration) -> Result<(), GateError> {
        TcpProbe::new(host, port, timeout).check().await
    }
}
