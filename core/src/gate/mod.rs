//! Reachability gate
//!
//! Decides, before any service-specific code runs, whether a check should
//! proceed, be skipped (service disabled by its `ENABLE_*` flag) or fail
//! (service not reachable over TCP within the polling window).
//!
//! ## Types
//!
//! - [`ServiceGate`]: the gate itself
//! - [`GateDecision`]: `Proceed` or a terminal [`CheckResult`]
//! - [`Dialer`]: one dial attempt; [`TcpDialer`] in production, fakes in tests
//! - [`GateConfig`]: polling window, per-attempt timeout, retry interval

pub mod error;
pub mod tcp;

pub use error::GateError;
pub use tcp::{TcpDialer, TcpProbe};

use async_trait::async_trait;
use schema::CheckResult;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::env::{env_bool, EnvSource};

/// Default total time allowed for a service to become reachable
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(2);
/// Default timeout of a single dial attempt
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(500);
/// Default pause between dial attempts
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(200);

/// One connection attempt against `host:port`
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Returns `Ok(())` if a connection could be established within `timeout`.
    async fn dial(&self, host: &str, port: u16, timeout: Duration) -> Result<(), GateError>;
}

/// Timing of the reachability poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateConfig {
    /// Polling deadline, measured from the first attempt
    pub window: Duration,
    /// Timeout of each dial attempt
    pub attempt_timeout: Duration,
    /// Sleep after each failed attempt
    pub retry_interval: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

/// Outcome of the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Run the probe
    Proceed,
    /// The check is over; this is its result (SKIP or FAIL, zero duration)
    Done(CheckResult),
}

impl GateDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GateDecision::Proceed)
    }
}

/// Poll `host:port` until it accepts a connection or the window elapses
pub async fn wait_for_port(dialer: &dyn Dialer, host: &str, port: u16, config: &GateConfig) -> bool {
    let deadline = Instant::now() + config.window;
    let mut attempts = 0u32;

    while Instant::now() < deadline {
        attempts += 1;
        match dialer.dial(host, port, config.attempt_timeout).await {
            Ok(()) => {
                debug!(attempts, "{}:{} reachable", host, port);
                return true;
            }
            Err(e) => debug!(attempts, "{}:{} not reachable yet: {}", host, port, e),
        }
        sleep(config.retry_interval).await;
    }

    warn!(
        attempts,
        "{}:{} did not accept a connection within {:?}", host, port, config.window
    );
    false
}

/// The flag-then-reachability gate run before every probe
pub struct ServiceGate<'a> {
    env: &'a dyn EnvSource,
    dialer: &'a dyn Dialer,
    config: &'a GateConfig,
}

impl<'a> ServiceGate<'a> {
    pub fn new(env: &'a dyn EnvSource, dialer: &'a dyn Dialer, config: &'a GateConfig) -> Self {
        Self { env, dialer, config }
    }

    /// Decide whether `service` should be checked
    ///
    /// The enable flag is consulted first so disabled services never pay the
    /// polling window. A port of 0 skips the reachability poll.
    pub async fn verify(
        &self,
        service: &str,
        client: &str,
        env_flag: &str,
        default_enabled: bool,
        host: &str,
        port: u16,
    ) -> GateDecision {
        if !env_bool(self.env, env_flag, default_enabled) {
            debug!("{} disabled via {}", service, env_flag);
            return GateDecision::Done(CheckResult::skip(
                service,
                client,
                format!("{}=false -> service intentionally disabled", env_flag),
            ));
        }

        if port > 0 && !wait_for_port(self.dialer, host, port, self.config).await {
            return GateDecision::Done(CheckResult::fail(
                service,
                client,
                format!("{}:{} is not reachable", host, port),
            ));
        }

        GateDecision::Proceed
    }
}
