//! Timed check runner
//!
//! Wraps a probe's round-trip, measures its wall-clock duration and turns
//! the outcome into a PASS or FAIL [`CheckResult`].

use schema::{CheckResult, Status};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::services::ProbeError;

/// Run `probe` and record how long it took
pub async fn run_check<F>(service: &str, client: &str, probe: F) -> CheckResult
where
    F: Future<Output = Result<String, ProbeError>>,
{
    run_check_with_timeout(service, client, None, probe).await
}

/// Like [`run_check`], optionally bounding the probe by `limit`
///
/// An elapsed limit is reported as a FAIL like any other probe error.
pub async fn run_check_with_timeout<F>(
    service: &str,
    client: &str,
    limit: Option<Duration>,
    probe: F,
) -> CheckResult
where
    F: Future<Output = Result<String, ProbeError>>,
{
    let start = Instant::now();
    let outcome = match limit {
        Some(limit) => tokio::time::timeout(limit, probe)
            .await
            .unwrap_or(Err(ProbeError::Timeout(limit))),
        None => probe.await,
    };
    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(detail) => {
            debug!("{} passed in {} ms", service, duration_ms);
            CheckResult::completed(service, client, Status::Pass, detail, duration_ms)
        }
        Err(e) => {
            debug!(code = e.code(), "{} failed in {} ms: {}", service, duration_ms, e);
            CheckResult::completed(service, client, Status::Fail, e.to_string(), duration_ms)
        }
    }
}
