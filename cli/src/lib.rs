//! Result reporting for the `stackcheck` binary
//!
//! Renders a [`Report`] either as the human-readable, colored listing or
//! as pretty-printed JSON. Rendering writes to any [`Write`] so the binary
//! can target stdout while tests target a buffer.

pub mod error;

pub use error::{CliError, Result};

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use schema::{CheckResult, Report, Status};
use std::io::Write;

const RULE: &str = "==========================================";
const TITLE: &str = "Stack Connectivity Checks";

/// How the report is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One colored line per check plus a summary
    #[default]
    Text,
    /// Pretty-printed JSON report
    Json,
}

/// Status glyph used in the text listing
pub fn glyph(status: Status) -> &'static str {
    match status {
        Status::Pass => "✓",
        Status::Fail => "✗",
        Status::Skip => "⊘",
    }
}

/// Format one result as an uncolored report line
pub fn format_line(result: &CheckResult) -> String {
    format!(
        "[{}] {:15} via {:20} ({:>4} ms) -> {}",
        glyph(result.status()),
        result.service(),
        result.client(),
        result.duration_ms(),
        result.detail()
    )
}

fn paint(line: String, status: Status) -> ColoredString {
    match status {
        Status::Pass => line.green(),
        Status::Fail => line.red(),
        Status::Skip => line.yellow(),
    }
}

/// Write the banner, one line per result, and the summary block
pub fn render_text<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "{}", TITLE.bold())?;
    writeln!(out, "{RULE}")?;
    writeln!(out)?;

    for result in &report.results {
        writeln!(out, "{}", paint(format_line(result), result.status()))?;
    }

    let summary = &report.summary;
    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    writeln!(
        out,
        "Summary: {} passed, {} failed, {} skipped",
        summary.passed, summary.failed, summary.skipped
    )?;
    writeln!(out, "{RULE}")?;
    Ok(())
}

/// Write the report as pretty-printed JSON followed by a newline
pub fn render_json<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Write the report in the requested format
pub fn render<W: Write>(out: &mut W, report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => render_text(out, report),
        OutputFormat::Json => render_json(out, report),
    }
}
