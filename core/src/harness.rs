//! Check harness
//!
//! [`Harness`] bundles the capabilities every probe needs (environment
//! access, the reachability gate and the timed runner) and drives the
//! gate-then-run pipeline over the configured probes, one at a time.

use schema::CheckResult;
use std::future::Future;
use std::time::Duration;
use tracing::info;

use crate::env::{get_env, get_env_u16, EnvSource, ProcessEnv};
use crate::gate::{Dialer, GateConfig, GateDecision, ServiceGate, TcpDialer};
use crate::runner::run_check_with_timeout;
use crate::services::{default_probes, ProbeError, ServiceProbe};

/// Tunables for a harness run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarnessConfig {
    pub gate: GateConfig,
    /// Overall limit for each probe's round-trip; `None` leaves timing to
    /// the client libraries
    pub operation_timeout: Option<Duration>,
}

/// Environment, gate and runner shared by all probes of a run
pub struct Harness {
    env: Box<dyn EnvSource>,
    dialer: Box<dyn Dialer>,
    config: HarnessConfig,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(HarnessConfig::default())
    }
}

impl Harness {
    /// Harness over the process environment and real TCP dials
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            env: Box::new(ProcessEnv),
            dialer: Box::new(TcpDialer),
            config,
        }
    }

    /// Replace the environment source
    #[must_use]
    pub fn with_env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Replace the dialer used by the reachability gate
    #[must_use]
    pub fn with_dialer(mut self, dialer: impl Dialer + 'static) -> Self {
        self.dialer = Box::new(dialer);
        self
    }

    pub fn env(&self) -> &dyn EnvSource {
        self.env.as_ref()
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn get_env(&self, key: &str, default: &str) -> String {
        get_env(self.env(), key, default)
    }

    pub fn get_env_u16(&self, key: &str, default: u16) -> u16 {
        get_env_u16(self.env(), key, default)
    }

    /// Run the reachability gate for one service
    pub async fn verify_service_gate(
        &self,
        service: &str,
        client: &str,
        env_flag: &str,
        default_enabled: bool,
        host: &str,
        port: u16,
    ) -> GateDecision {
        ServiceGate::new(self.env(), self.dialer.as_ref(), &self.config.gate)
            .verify(service, client, env_flag, default_enabled, host, port)
            .await
    }

    /// Time `probe` and convert its outcome into a result
    pub async fn run_check<F>(&self, service: &str, client: &str, probe: F) -> CheckResult
    where
        F: Future<Output = Result<String, ProbeError>>,
    {
        run_check_with_timeout(service, client, self.config.operation_timeout, probe).await
    }

    /// Gate, then run, one probe
    pub async fn check(&self, probe: &dyn ServiceProbe) -> CheckResult {
        let descriptor = probe.descriptor();
        let endpoint = probe.endpoint();

        let decision = self
            .verify_service_gate(
                descriptor.service,
                descriptor.client,
                descriptor.enable_flag,
                descriptor.default_enabled,
                &endpoint.host,
                endpoint.port,
            )
            .await;
        if let GateDecision::Done(result) = decision {
            return result;
        }

        info!("checking {} at {}", descriptor.service, endpoint.address());
        self.run_check(descriptor.service, descriptor.client, probe.round_trip())
            .await
    }

    /// Check `probes` sequentially, in order; one result per probe
    pub async fn run_probes(&self, probes: &[Box<dyn ServiceProbe>]) -> Vec<CheckResult> {
        let mut results = Vec::with_capacity(probes.len());
        for probe in probes {
            let result = self.check(probe.as_ref()).await;
            info!(
                status = result.status().as_str(),
                duration_ms = result.duration_ms(),
                "{} finished",
                result.service()
            );
            results.push(result);
        }
        results
    }

    /// Check all six services configured from this harness's environment
    pub async fn run_all(&self) -> Vec<CheckResult> {
        let probes = default_probes(self.env());
        self.run_probes(&probes).await
    }
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod harness_tests;
