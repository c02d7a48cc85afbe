//! Game stat line parsing
//!
//! Input: a JSON object keyed by player id, each value an object keyed by
//! game id (`YYYYMMDD_AWAY@HOME`) mapping to that player's box score for the
//! game. Every stat arrives as a string from upstream and is coerced here.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{numeric_field, str_field, FeedError};
use crate::clock;

/// One player's line for one game. Keyed by (game_id, player_id).
#[derive(Debug, Clone)]
pub struct GameStatRecord {
    pub game_id: String,
    pub player_id: String,
    pub team: Option<String>,
    pub opponent: String,
    pub is_home: bool,
    pub game_date: DateTime<Utc>,

    pub minutes: Option<f64>,
    pub points: Option<f64>,
    pub rebounds: Option<f64>,
    pub offensive_rebounds: Option<f64>,
    pub defensive_rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub steals: Option<f64>,
    pub blocks: Option<f64>,
    pub turnovers: Option<f64>,
    pub personal_fouls: Option<f64>,
    pub field_goals_made: Option<f64>,
    pub field_goals_attempted: Option<f64>,
    pub field_goal_pct: Option<f64>,
    pub three_pointers_made: Option<f64>,
    pub three_pointers_attempted: Option<f64>,
    pub three_point_pct: Option<f64>,
    pub free_throws_made: Option<f64>,
    pub free_throws_attempted: Option<f64>,
    pub free_throw_pct: Option<f64>,
    pub plus_minus: Option<f64>,
    pub fantasy_points: Option<f64>,
}

/// A raw (player id, game id, box score) triple, flattened from the nested
/// input so the batch layer can treat each line independently.
#[derive(Debug)]
pub struct StatEntry<'a> {
    pub player_id: String,
    pub game_id: String,
    pub raw: &'a Value,
}

impl StatEntry<'_> {
    /// Derived identifier used as the stat line's natural key string.
    pub fn key(&self) -> String {
        format!("{}:{}", self.game_id, self.player_id)
    }
}

/// Flatten the player-scoped wrapper into per-line entries.
pub fn flatten_stat_entries(payload: &Value) -> Result<Vec<StatEntry<'_>>, FeedError> {
    let players = payload.as_object().ok_or(FeedError::ExpectedObject)?;

    let mut entries = vec![];
    for (player_id, games) in players {
        let games = games.as_object().ok_or(FeedError::ExpectedObject)?;
        for (game_id, raw) in games {
            entries.push(StatEntry {
                player_id: player_id.clone(),
                game_id: game_id.clone(),
                raw,
            });
        }
    }

    Ok(entries)
}

/// Build a typed stat record from one flattened entry. Fails only when the
/// game id itself will not parse; individual stats degrade to NULL.
pub fn parse_stat_record(entry: &StatEntry<'_>) -> Result<GameStatRecord, FeedError> {
    let team = str_field(entry.raw, "teamAbv");
    let parts = clock::parse_game_id(&entry.game_id, team.as_deref().unwrap_or(""))
        .ok_or_else(|| FeedError::BadGameId(entry.game_id.clone()))?;

    let raw = entry.raw;
    Ok(GameStatRecord {
        game_id: entry.game_id.clone(),
        player_id: entry.player_id.clone(),
        team,
        opponent: parts.opponent,
        is_home: parts.is_home,
        game_date: parts.game_date,
        minutes: numeric_field(raw, "mins"),
        points: numeric_field(raw, "pts"),
        rebounds: numeric_field(raw, "reb"),
        offensive_rebounds: numeric_field(raw, "OffReb"),
        defensive_rebounds: numeric_field(raw, "DefReb"),
        assists: numeric_field(raw, "ast"),
        steals: numeric_field(raw, "stl"),
        blocks: numeric_field(raw, "blk"),
        turnovers: numeric_field(raw, "TOV"),
        personal_fouls: numeric_field(raw, "PF"),
        field_goals_made: numeric_field(raw, "fgm"),
        field_goals_attempted: numeric_field(raw, "fga"),
        field_goal_pct: numeric_field(raw, "fgp"),
        three_pointers_made: numeric_field(raw, "tptfgm"),
        three_pointers_attempted: numeric_field(raw, "tptfga"),
        three_point_pct: numeric_field(raw, "tptfgp"),
        free_throws_made: numeric_field(raw, "ftm"),
        free_throws_attempted: numeric_field(raw, "fta"),
        free_throw_pct: numeric_field(raw, "ftp"),
        plus_minus: numeric_field(raw, "plusMinus"),
        fantasy_points: numeric_field(raw, "fantasyPoints"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "28166203": {
                "20240115_BOS@DEN": {
                    "teamAbv": "DEN", "mins": "36", "pts": "25", "reb": "12",
                    "OffReb": "3", "DefReb": "9", "ast": "9", "stl": "1",
                    "blk": "1", "TOV": "2", "PF": "3", "fgm": "10", "fga": "18",
                    "fgp": "55.6", "tptfgm": "1", "tptfga": "3", "tptfgp": "33.3",
                    "ftm": "4", "fta": "5", "ftp": "80.0", "plusMinus": "+8",
                    "fantasyPoints": "52.75"
                },
                "20240117_DEN@LAL": {
                    "teamAbv": "DEN", "pts": "30", "reb": "bad-data"
                }
            }
        })
    }

    #[test]
    fn flattens_the_player_scoped_wrapper() {
        let payload = sample_payload();
        let entries = flatten_stat_entries(&payload).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.player_id == "28166203"));
        assert_eq!(entries[0].key(), "20240115_BOS@DEN:28166203");
    }

    #[test]
    fn parses_a_full_stat_line() {
        let payload = sample_payload();
        let entries = flatten_stat_entries(&payload).unwrap();
        let home = entries.iter().find(|e| e.game_id.contains("BOS@DEN")).unwrap();

        let record = parse_stat_record(home).unwrap();
        assert_eq!(record.opponent, "BOS");
        assert!(record.is_home);
        assert_eq!(record.game_date.date_naive().to_string(), "2024-01-15");
        assert_eq!(record.points, Some(25.0));
        assert_eq!(record.plus_minus, Some(8.0));
        assert_eq!(record.fantasy_points, Some(52.75));
    }

    #[test]
    fn bad_stat_degrades_to_null_but_record_survives() {
        let payload = sample_payload();
        let entries = flatten_stat_entries(&payload).unwrap();
        let away = entries.iter().find(|e| e.game_id.contains("DEN@LAL")).unwrap();

        let record = parse_stat_record(away).unwrap();
        assert_eq!(record.points, Some(30.0));
        assert_eq!(record.rebounds, None);
        assert_eq!(record.opponent, "LAL");
        assert!(!record.is_home);
    }

    #[test]
    fn unparseable_game_id_fails_that_record_only() {
        let payload = json!({"p1": {"not-a-game-id": {"pts": "10"}}});
        let entries = flatten_stat_entries(&payload).unwrap();
        assert!(matches!(
            parse_stat_record(&entries[0]),
            Err(FeedError::BadGameId(_))
        ));
    }
}
