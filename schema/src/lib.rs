//! Schema definitions for stackcheck
//!
//! This crate contains the data structures shared between the check engine
//! and the reporter. All types here implement JSON Schema generation for
//! consumers of the `--format json` output.

pub mod result;


use chrono::{SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use result::{CheckResult, Status, Summary};

/// Version of the JSON report layout
pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Full outcome of one harness run
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Layout version, see [`REPORT_SCHEMA_VERSION`]
    pub schema_version: String,
    /// RFC3339 time the report was assembled
    pub timestamp: String,
    /// One entry per service, in check order
    pub results: Vec<CheckResult>,
    pub summary: Summary,
}

impl Report {
    /// Assemble a report, computing the summary from `results`
    #[must_use]
    pub fn new(results: Vec<CheckResult>) -> Self {
        let summary = Summary::from_results(&results);
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            results,
            summary,
        }
    }

    /// Exit code for the whole run
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.summary.exit_code()
    }
}
