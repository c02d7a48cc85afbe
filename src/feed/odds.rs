//! Betting odds payload parsing
//!
//! Input: one game's entry from the betting-odds endpoint, an object with
//! the matchup teams plus one sub-object per bookmaker. Provider selection
//! walks the configured preference list; the first bookmaker present wins.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{coerce_f64, str_field, FeedError};
use crate::clock;

/// The odds patch fanned out to every projection of a game. Numeric fields
/// that fail coercion are stored as NULL rather than rejecting the patch.
#[derive(Debug, Clone)]
pub struct OddsUpdate {
    pub home_team: String,
    pub away_team: String,
    pub home_spread: Option<f64>,
    pub away_spread: Option<f64>,
    pub total_over: Option<f64>,
    pub total_under: Option<f64>,
    pub home_moneyline: Option<f64>,
    pub away_moneyline: Option<f64>,
    pub provider: String,
    pub last_updated: DateTime<Utc>,
}

/// Pick a bookmaker from the payload by preference order and build the
/// update. `last_updated` comes from the payload's epoch field when present,
/// otherwise the current instant.
pub fn select_odds(payload: &Value, providers: &[String]) -> Result<OddsUpdate, FeedError> {
    let provider = providers
        .iter()
        .find(|p| payload.get(p.as_str()).map(Value::is_object).unwrap_or(false))
        .ok_or_else(|| FeedError::NoOddsProvider(providers.join(", ")))?;

    let book = &payload[provider.as_str()];

    let numeric = |field: &str| book.get(field).and_then(coerce_f64);

    Ok(OddsUpdate {
        home_team: str_field(payload, "homeTeam").unwrap_or_default(),
        away_team: str_field(payload, "awayTeam").unwrap_or_default(),
        home_spread: numeric("homeTeamSpread"),
        away_spread: numeric("awayTeamSpread"),
        total_over: numeric("totalOver"),
        total_under: numeric("totalUnder"),
        home_moneyline: numeric("homeTeamMLOdds"),
        away_moneyline: numeric("awayTeamMLOdds"),
        provider: provider.clone(),
        last_updated: clock::normalize_epoch(payload.get("last_updated_e_time")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn providers() -> Vec<String> {
        ["draftkings", "fanduel", "betmgm", "bet365"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn sample_payload() -> Value {
        json!({
            "homeTeam": "DEN",
            "awayTeam": "BOS",
            "last_updated_e_time": "1705368600",
            "fanduel": {
                "homeTeamSpread": "-3.5",
                "awayTeamSpread": "+3.5",
                "totalOver": "228.5",
                "totalUnder": "228.5",
                "homeTeamMLOdds": "-165",
                "awayTeamMLOdds": "+140"
            }
        })
    }

    #[test]
    fn walks_the_preference_list() {
        let update = select_odds(&sample_payload(), &providers()).unwrap();
        assert_eq!(update.provider, "fanduel");
        assert_eq!(update.home_spread, Some(-3.5));
        assert_eq!(update.away_moneyline, Some(140.0));
        assert_eq!(update.last_updated.to_rfc3339(), "2024-01-16T01:30:00+00:00");
    }

    #[test]
    fn preferred_provider_wins_when_present() {
        let mut payload = sample_payload();
        payload["draftkings"] = json!({"homeTeamSpread": "-4.0"});
        let update = select_odds(&payload, &providers()).unwrap();
        assert_eq!(update.provider, "draftkings");
        assert_eq!(update.home_spread, Some(-4.0));
        // Fields the chosen book does not quote are NULL, not borrowed
        // from another book.
        assert_eq!(update.total_over, None);
    }

    #[test]
    fn no_known_provider_is_an_error() {
        let payload = json!({"homeTeam": "DEN", "awayTeam": "BOS", "caesars": {}});
        assert!(matches!(
            select_odds(&payload, &providers()),
            Err(FeedError::NoOddsProvider(_))
        ));
    }

    #[test]
    fn unquotable_numerics_become_null() {
        let mut payload = sample_payload();
        payload["fanduel"]["totalOver"] = json!("even");
        let update = select_odds(&payload, &providers()).unwrap();
        assert_eq!(update.total_over, None);
        assert_eq!(update.total_under, Some(228.5));
    }

    #[test]
    fn missing_epoch_defaults_to_now() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("last_updated_e_time");
        let before = Utc::now();
        let update = select_odds(&payload, &providers()).unwrap();
        assert!(update.last_updated >= before);
    }
}
