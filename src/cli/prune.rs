//! Prune command implementation

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::store::StatStore;

pub fn run(store: &StatStore) -> Result<()> {
    // "Now" is captured once; everything strictly before it goes.
    let now = Utc::now();
    let deleted = store.delete_expired_projections(now)?;

    info!(deleted, "deleted expired projections");
    println!("{}", json!({"success": true, "deletedCount": deleted}));
    Ok(())
}
