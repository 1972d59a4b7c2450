//! Core functionality for stackcheck
//!
//! This crate contains the check engine: environment access, the
//! reachability gate, the timed runner, the [`Harness`] that ties them
//! together, and the six service probes.

pub mod env;
pub mod error;
pub mod gate;
pub mod harness;
pub mod runner;
pub mod services;


// Re-export schema types for convenience
pub use schema::{CheckResult, Report, Status, Summary};

pub use error::{CoreError, Result};
pub use gate::{GateConfig, GateDecision};
pub use harness::{Harness, HarnessConfig};
pub use services::{default_probes, ProbeError, ServiceProbe};

/// Core utilities and helper functions
pub mod utils {
    use tracing::{debug, info};

    /// Initialize tracing for the application
    ///
    /// Logs go to stderr so stdout carries only the report. `RUST_LOG`
    /// takes precedence over `level`.
    pub fn init_tracing(level: &str) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|e| crate::CoreError::InitializationError(e.to_string()))?;

        info!("Tracing initialized with level: {}", level);
        Ok(())
    }

    /// Validate harness configuration values
    pub fn validate_config(config: &crate::HarnessConfig) -> crate::Result<()> {
        let gate = &config.gate;
        if gate.window.is_zero() {
            return Err(crate::CoreError::ConfigurationError(
                "Gate window must be greater than 0".to_string(),
            ));
        }

        if gate.attempt_timeout.is_zero() {
            return Err(crate::CoreError::ConfigurationError(
                "Gate attempt timeout must be greater than 0".to_string(),
            ));
        }

        if gate.attempt_timeout > gate.window {
            return Err(crate::CoreError::ConfigurationError(format!(
                "Gate attempt timeout ({:?}) cannot exceed the gate window ({:?})",
                gate.attempt_timeout, gate.window
            )));
        }

        if config.operation_timeout.is_some_and(|t| t.is_zero()) {
            return Err(crate::CoreError::ConfigurationError(
                "Operation timeout must be greater than 0".to_string(),
            ));
        }

        debug!("Configuration validated successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_validate_config() {
        let mut config = HarnessConfig::default();
        assert!(utils::validate_config(&config).is_ok());

        config.gate.window = Duration::ZERO;
        assert!(utils::validate_config(&config).is_err());

        config.gate.window = Duration::from_secs(2);
        config.gate.attempt_timeout = Duration::ZERO;
        assert!(utils::validate_config(&config).is_err());

        config.gate.attempt_timeout = Duration::from_secs(3);
        let err = utils::validate_config(&config).unwrap_err();
        assert_eq!(err.code(), "CORE001");

        config.gate.attempt_timeout = Duration::from_millis(500);
        config.operation_timeout = Some(Duration::ZERO);
        assert!(utils::validate_config(&config).is_err());

        config.operation_timeout = Some(Duration::from_secs(30));
        assert!(utils::validate_config(&config).is_ok());
    }

    #[test]
    fn test_default_gate_timings() {
        let config = HarnessConfig::default();
        assert_eq!(config.gate.window, Duration::from_secs(2));
        assert_eq!(config.gate.attempt_timeout, Duration::from_millis(500));
        assert_eq!(config.gate.retry_interval, Duration::from_millis(200));
        assert_eq!(config.operation_timeout, None);
    }
}
