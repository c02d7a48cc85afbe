//! Sync-stats command implementation

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use super::{batch_summary, read_payload};
use crate::batch::process_batch;
use crate::feed;
use crate::store::StatStore;

pub fn run(store: &StatStore, file: &Path) -> Result<()> {
    let payload = read_payload(file)?;
    let entries =
        feed::flatten_stat_entries(&payload).context("invalid game stats payload")?;

    info!(lines = entries.len(), "syncing game stat lines");

    let report = process_batch(
        &entries,
        |e| e.key(),
        |e| {
            let record = feed::parse_stat_record(e)?;
            store.upsert_game_stat(&record)
        },
    );

    println!("{}", batch_summary(&report));
    Ok(())
}
