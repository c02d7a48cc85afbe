//! Partial-failure batch aggregation
//!
//! Every record in a batch is reconciled independently; one bad record must
//! not sink the rest. The report carries enough per-key detail for an
//! operator to chase down the failures afterwards.

use anyhow::Result;
use serde::Serialize;
use tracing::error;

/// One failed record: its natural key and why it failed.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub key: String,
    pub reason: String,
}

/// Outcome of a batch run. `succeeded + failed.len() == total`.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Apply `op` to every item, collecting per-key outcomes. Errors are
/// recorded and the batch continues; there is no retry and no rollback of
/// earlier successes.
pub fn process_batch<T, K, F>(items: &[T], key: K, mut op: F) -> BatchReport
where
    K: Fn(&T) -> String,
    F: FnMut(&T) -> Result<()>,
{
    let mut report = BatchReport {
        total: items.len(),
        ..Default::default()
    };

    for item in items {
        let item_key = key(item);
        match op(item) {
            Ok(()) => report.succeeded.push(item_key),
            Err(e) => {
                error!(key = %item_key, error = %e, "record failed, continuing batch");
                report.failed.push(BatchFailure {
                    key: item_key,
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    report
}
