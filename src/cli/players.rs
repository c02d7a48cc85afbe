//! Sync-players command implementation

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use tracing::info;

use super::{batch_summary, read_payload};
use crate::batch::process_batch;
use crate::feed;
use crate::store::StatStore;

pub fn run(store: &StatStore, file: &Path) -> Result<()> {
    let payload = read_payload(file)?;
    let batch = feed::parse_players(&payload).context("invalid players payload")?;

    info!(
        records = batch.records.len(),
        skipped = batch.skipped,
        "syncing players"
    );

    let report = process_batch(
        &batch.records,
        |r| r.player_id.clone(),
        |r| store.upsert_player(r),
    );

    let mut summary = batch_summary(&report);
    summary["skipped"] = json!(batch.skipped);
    println!("{summary}");
    Ok(())
}

/// Print the stored player ids, for upstream fetchers that iterate the
/// roster.
pub fn list(store: &StatStore) -> Result<()> {
    let ids = store.list_player_ids()?;
    println!(
        "{}",
        json!({"success": true, "count": ids.len(), "playerIds": ids})
    );
    Ok(())
}
