//! Sync-projections command implementation
//!
//! Prunes already-started projections before syncing the new batch, the
//! same order the upstream fetcher uses. A prune failure is a warning, not
//! a reason to skip the sync.

use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use tracing::{info, warn};

use super::{batch_summary, read_payload};
use crate::batch::process_batch;
use crate::feed::{self, FeedError};
use crate::store::StatStore;

pub fn run(store: &StatStore, file: &Path, prune_expired: bool) -> Result<()> {
    let payload = read_payload(file)?;
    let entries = payload.as_array().ok_or(FeedError::ExpectedArray)?;

    if prune_expired {
        match store.delete_expired_projections(Utc::now()) {
            Ok(deleted) => info!(deleted, "pruned expired projections"),
            Err(e) => warn!(error = %e, "failed to prune expired projections, continuing"),
        }
    }

    info!(records = entries.len(), "syncing projections");

    let report = process_batch(entries, feed::projection_key, |raw| {
        let record = feed::parse_projection(raw)?;
        store.upsert_projection(&record)
    });

    println!("{}", batch_summary(&report));
    Ok(())
}
