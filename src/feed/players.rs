//! Player list parsing
//!
//! Input: a JSON array of player objects from the roster endpoint. Entries
//! missing any identity field are skipped and counted rather than stored
//! half-formed.

use serde_json::Value;

use super::{str_field, FeedError};

/// A player as stored. `player_id` is the stable external identifier and the
/// natural key; everything else is mutable across syncs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub player_id: String,
    pub name: String,
    pub position: String,
    pub team: String,
    pub team_id: String,
}

/// Parse result: the usable records plus how many entries were dropped for
/// missing fields.
#[derive(Debug)]
pub struct PlayerBatch {
    pub records: Vec<PlayerRecord>,
    pub skipped: usize,
}

/// Parse the player array. Accepts both the raw roster field names
/// (`longName`, `pos`) and the flattened ones (`playerName`, `position`).
pub fn parse_players(payload: &Value) -> Result<PlayerBatch, FeedError> {
    let entries = payload.as_array().ok_or(FeedError::ExpectedArray)?;

    let mut records = Vec::with_capacity(entries.len());
    let mut skipped = 0;

    for entry in entries {
        let player_id = str_field(entry, "playerID");
        let name = str_field(entry, "playerName").or_else(|| str_field(entry, "longName"));
        let position = str_field(entry, "position").or_else(|| str_field(entry, "pos"));
        let team = str_field(entry, "team");
        let team_id = str_field(entry, "teamID");

        match (player_id, name, position, team, team_id) {
            (Some(player_id), Some(name), Some(position), Some(team), Some(team_id)) => {
                records.push(PlayerRecord {
                    player_id,
                    name,
                    position,
                    team,
                    team_id,
                });
            }
            _ => skipped += 1,
        }
    }

    Ok(PlayerBatch { records, skipped })
}
