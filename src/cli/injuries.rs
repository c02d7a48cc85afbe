//! Injuries command implementation
//!
//! Joins an injury report against stored players and each injured player's
//! upcoming projections, so an operator can see which lines are at risk.
//! Injured players the store has never seen are counted, not fatal.

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::json;
use std::path::Path;
use tracing::{info, warn};

use super::read_payload;
use crate::feed;
use crate::store::StatStore;

pub fn run(store: &StatStore, file: &Path) -> Result<()> {
    let payload = read_payload(file)?;
    let injuries = feed::parse_injuries(&payload).context("invalid injury payload")?;
    let now = Utc::now();

    let mut report = Vec::new();
    let mut affected = 0usize;
    let mut unmatched = 0usize;

    for injury in &injuries {
        let Some(player) = store.get_player(&injury.player_id)? else {
            warn!(player_id = %injury.player_id, "injured player not in store");
            unmatched += 1;
            continue;
        };

        let projections = store.list_future_projections(&player.name, now)?;
        if !projections.is_empty() {
            affected += 1;
        }

        report.push(json!({
            "playerName": player.name,
            "team": player.team,
            "position": player.position,
            "status": injury.designation,
            "description": injury.description,
            "injuryDate": injury.injury_date,
            "expectedReturnDate": injury.return_date,
            "hasProjections": !projections.is_empty(),
            "projections": projections
                .iter()
                .map(|p| {
                    json!({
                        "projectionId": p.projection_id,
                        "statType": p.stat_type,
                        "lineScore": p.line_score,
                        "gameId": p.game_id,
                        "startTime": p.start_time,
                    })
                })
                .collect::<Vec<_>>(),
        }));
    }

    info!(
        players = report.len(),
        affected, unmatched, "joined injury report"
    );
    println!(
        "{}",
        json!({
            "success": true,
            "count": report.len(),
            "affected": affected,
            "unmatched": unmatched,
            "report": report,
        })
    );
    Ok(())
}
