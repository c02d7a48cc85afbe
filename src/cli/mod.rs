//! Command implementations
//!
//! Each command prints exactly one JSON summary line to stdout; progress
//! and warnings go to stderr through tracing. Operators and cron wrappers
//! parse stdout, humans read stderr.

pub mod injuries;
pub mod odds;
pub mod players;
pub mod projections;
pub mod prune;
pub mod stats;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::Path;

use crate::batch::BatchReport;

/// Read and parse an input file. Failures here are input-level: the caller
/// aborts with a non-zero exit before touching the store.
pub(crate) fn read_payload(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Standard summary for batch commands: tallies always, failure details
/// when there are any.
pub(crate) fn batch_summary(report: &BatchReport) -> Value {
    let mut summary = json!({
        "success": true,
        "count": report.success_count(),
        "failed": report.failure_count(),
    });
    if !report.failed.is_empty() {
        summary["failures"] = serde_json::to_value(&report.failed).unwrap_or(Value::Null);
    }
    summary
}
