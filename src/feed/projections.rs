//! Projection parsing
//!
//! Input: a JSON array of flattened projection records from the projections
//! fetcher. `start_time` carries an explicit UTC offset and goes through the
//! timezone-safe normalizer; subject fields default to "N/A" when the
//! upstream relationship lookup came back empty.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{numeric_field, required_str, str_field, FeedError};
use crate::clock;

/// A betting projection, keyed by the external projection id.
#[derive(Debug, Clone)]
pub struct ProjectionRecord {
    pub projection_id: String,
    pub player_name: String,
    pub team: String,
    pub position: String,
    pub stat_type: String,
    pub line_score: f64,
    pub average: Option<f64>,
    pub max_value: Option<f64>,
    pub game_id: String,
    pub start_time: DateTime<Utc>,
    pub status: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub odds_type: Option<String>,
}

/// Natural key for a raw projection element, for failure reporting before
/// the element has fully parsed.
pub fn projection_key(raw: &Value) -> String {
    str_field(raw, "projectionId").unwrap_or_else(|| "<missing projectionId>".to_string())
}

/// Parse one projection element. Only the id is required; subject fields
/// default and numerics degrade to NULL.
pub fn parse_projection(raw: &Value) -> Result<ProjectionRecord, FeedError> {
    let projection_id = required_str(raw, "projectionId")?;

    let start_time = match raw.get("startTime").and_then(Value::as_str) {
        Some(s) => clock::normalize_timestamp(s),
        None => Utc::now(),
    };

    Ok(ProjectionRecord {
        projection_id,
        player_name: str_field(raw, "playerName").unwrap_or_else(na),
        team: str_field(raw, "team").unwrap_or_else(na),
        position: str_field(raw, "position").unwrap_or_else(na),
        stat_type: str_field(raw, "statType").unwrap_or_else(na),
        line_score: numeric_field(raw, "lineScore").unwrap_or(0.0),
        average: numeric_field(raw, "average"),
        max_value: numeric_field(raw, "maxValue"),
        game_id: str_field(raw, "gameId").unwrap_or_else(na),
        start_time,
        status: str_field(raw, "status").unwrap_or_else(na),
        description: str_field(raw, "description"),
        image_url: str_field(raw, "imageUrl"),
        odds_type: str_field(raw, "oddsType"),
    })
}

fn na() -> String {
    "N/A".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_complete_projection() {
        let raw = json!({
            "projectionId": "3724559",
            "playerName": "Nikola Jokic",
            "team": "DEN",
            "position": "C",
            "statType": "Points",
            "lineScore": "26.5",
            "average": 27.1,
            "maxValue": "41",
            "gameId": "20240115_BOS@DEN",
            "startTime": "2024-01-15T19:30:00-06:00",
            "status": "pre_game",
            "oddsType": "standard"
        });

        let record = parse_projection(&raw).unwrap();
        assert_eq!(record.projection_id, "3724559");
        assert_eq!(record.line_score, 26.5);
        assert_eq!(record.average, Some(27.1));
        assert_eq!(record.max_value, Some(41.0));
        assert_eq!(record.start_time.to_rfc3339(), "2024-01-16T01:30:00+00:00");
        assert_eq!(record.description, None);
    }

    #[test]
    fn subject_fields_default_and_line_score_is_zero() {
        let raw = json!({"projectionId": "1", "startTime": "2024-01-15T19:30:00-06:00"});
        let record = parse_projection(&raw).unwrap();
        assert_eq!(record.player_name, "N/A");
        assert_eq!(record.stat_type, "N/A");
        assert_eq!(record.game_id, "N/A");
        assert_eq!(record.line_score, 0.0);
    }

    #[test]
    fn missing_id_is_a_record_failure() {
        let raw = json!({"playerName": "Someone"});
        assert!(matches!(
            parse_projection(&raw),
            Err(FeedError::MissingField("projectionId"))
        ));
        assert_eq!(projection_key(&raw), "<missing projectionId>");
    }

    #[test]
    fn missing_start_time_becomes_now() {
        let before = Utc::now();
        let record = parse_projection(&json!({"projectionId": "2"})).unwrap();
        assert!(record.start_time >= before);
    }
}
