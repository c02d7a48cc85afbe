//! Attach-odds command implementation
//!
//! Takes either a stored game id or an odds-API `YYYYMMDD_AWAY@HOME` id;
//! when the direct lookup finds nothing, the id is matched against stored
//! projections by team abbreviations before giving up.

use anyhow::Result;
use serde_json::json;
use std::path::Path;
use tracing::info;

use super::read_payload;
use crate::config::Config;
use crate::feed;
use crate::matchup::GameIndex;
use crate::store::{EnrichOutcome, StatStore};

pub fn run(store: &StatStore, config: &Config, game_id: &str, file: &Path) -> Result<()> {
    let payload = read_payload(file)?;
    let update = feed::select_odds(&payload, &config.odds.providers)?;

    let mut outcome = store.attach_odds(game_id, &update)?;

    if outcome == EnrichOutcome::NoMatch {
        let index = GameIndex::from_pairs(&store.list_projection_games()?);
        if let Some(matched) = index.match_odds_game(game_id) {
            info!(api_game_id = game_id, matched = %matched, "matched odds game by team abbreviations");
            outcome = store.attach_odds(&matched, &update)?;
        }
    }

    match outcome {
        EnrichOutcome::NoMatch => {
            info!(game_id, "no projections reference this game");
            println!(
                "{}",
                json!({"success": true, "count": 0, "message": "no matching projections"})
            );
        }
        EnrichOutcome::Updated(count) => {
            info!(game_id, count, provider = %update.provider, "attached odds");
            println!("{}", json!({"success": true, "count": count}));
        }
    }

    Ok(())
}
