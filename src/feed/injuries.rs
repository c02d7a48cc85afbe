//! Injury report parsing
//!
//! Input: a JSON array of injury entries from the injury-list endpoint. A
//! player can appear more than once across the lookahead window; the latest
//! entry wins. Dates arrive as compact `YYYYMMDD` strings and are expanded
//! to ISO dates.

use serde_json::Value;
use std::collections::HashMap;

use super::{str_field, FeedError};

/// One player's current injury designation.
#[derive(Debug, Clone)]
pub struct InjuryRecord {
    pub player_id: String,
    pub designation: String,
    pub description: Option<String>,
    pub injury_date: Option<String>,
    pub return_date: Option<String>,
}

/// Parse the injury array, deduplicating by player id (the latest entry for
/// a player replaces earlier ones). Entries without a player id are skipped.
pub fn parse_injuries(payload: &Value) -> Result<Vec<InjuryRecord>, FeedError> {
    let entries = payload.as_array().ok_or(FeedError::ExpectedArray)?;

    let mut records: Vec<InjuryRecord> = Vec::new();
    let mut by_player: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let Some(player_id) = str_field(entry, "playerID") else {
            continue;
        };

        let record = InjuryRecord {
            player_id: player_id.clone(),
            designation: str_field(entry, "designation")
                .unwrap_or_else(|| "Unknown".to_string()),
            description: str_field(entry, "description"),
            injury_date: str_field(entry, "injDate").map(expand_compact_date),
            return_date: str_field(entry, "injReturnDate").map(expand_compact_date),
        };

        match by_player.get(&player_id) {
            Some(&i) => records[i] = record,
            None => {
                by_player.insert(player_id, records.len());
                records.push(record);
            }
        }
    }

    Ok(records)
}

/// `YYYYMMDD` -> `YYYY-MM-DD`; anything else passes through untouched.
fn expand_compact_date(raw: String) -> String {
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}-{}", &raw[..4], &raw[4..6], &raw[6..8])
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_entries_and_expands_compact_dates() {
        let payload = json!([
            {"playerID": "j1", "designation": "Out", "description": "Ankle sprain",
             "injDate": "20240110", "injReturnDate": "20240120"}
        ]);

        let records = parse_injuries(&payload).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].designation, "Out");
        assert_eq!(records[0].injury_date.as_deref(), Some("2024-01-10"));
        assert_eq!(records[0].return_date.as_deref(), Some("2024-01-20"));
    }

    #[test]
    fn latest_entry_for_a_player_wins() {
        let payload = json!([
            {"playerID": "j1", "designation": "Questionable", "injDate": "20240110"},
            {"playerID": "j2", "designation": "Out"},
            {"playerID": "j1", "designation": "Out", "injDate": "20240112"}
        ]);

        let records = parse_injuries(&payload).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].player_id, "j1");
        assert_eq!(records[0].designation, "Out");
        assert_eq!(records[0].injury_date.as_deref(), Some("2024-01-12"));
    }

    #[test]
    fn entries_without_a_player_id_are_skipped() {
        let payload = json!([
            {"designation": "Out"},
            {"playerID": "j1"}
        ]);

        let records = parse_injuries(&payload).unwrap();
        assert_eq!(records.len(), 1);
        // Missing designation degrades to the unknown marker.
        assert_eq!(records[0].designation, "Unknown");
    }

    #[test]
    fn odd_shaped_dates_pass_through() {
        let payload = json!([
            {"playerID": "j1", "injDate": "2024-01-10", "injReturnDate": "TBD"}
        ]);

        let records = parse_injuries(&payload).unwrap();
        assert_eq!(records[0].injury_date.as_deref(), Some("2024-01-10"));
        assert_eq!(records[0].return_date.as_deref(), Some("TBD"));
    }

    #[test]
    fn non_array_payload_is_an_input_error() {
        assert!(matches!(
            parse_injuries(&json!({"body": []})),
            Err(FeedError::ExpectedArray)
        ));
    }
}
