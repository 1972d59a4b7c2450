//! Check outcome types
//!
//! A [`CheckResult`] is produced exactly once per service per run, either by
//! the reachability gate (skip / early failure) or by the timed runner.
//! Results are never mutated after construction.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Final status of a single service check
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// The round-trip completed successfully
    Pass,
    /// The service was unreachable or the round-trip failed
    Fail,
    /// The service was intentionally disabled
    Skip,
}

impl Status {
    /// Upper-case label used in text and JSON output
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Skip => "SKIP",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one service check
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    service: String,
    client: String,
    status: Status,
    detail: String,
    duration_ms: u64,
}

impl CheckResult {
    /// A skipped check. Skips never run the probe, so the duration is zero.
    #[must_use]
    pub fn skip(service: impl Into<String>, client: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::completed(service, client, Status::Skip, reason, 0)
    }

    /// A check that failed before its probe could run (duration zero)
    #[must_use]
    pub fn fail(service: impl Into<String>, client: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::completed(service, client, Status::Fail, reason, 0)
    }

    /// A check whose probe ran for `duration_ms` milliseconds
    #[must_use]
    pub fn completed(
        service: impl Into<String>,
        client: impl Into<String>,
        status: Status,
        detail: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            service: service.into(),
            client: client.into(),
            status,
            detail: detail.into(),
            duration_ms,
        }
    }

    /// Display name of the checked service (e.g. "PostgreSQL")
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Identifier of the client library used for the check
    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Human-readable outcome or error text
    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

/// Pass/fail/skip tally over a set of results
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    /// Count the statuses of `results`
    #[must_use]
    pub fn from_results(results: &[CheckResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            match r.status() {
                Status::Pass => acc.passed += 1,
                Status::Fail => acc.failed += 1,
                Status::Skip => acc.skipped += 1,
            }
            acc
        })
    }

    /// Total number of results counted
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// Process exit code for this summary: 1 if anything failed, 0 otherwise.
    /// Skipped checks never affect the exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }
}
