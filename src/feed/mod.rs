//! Typed ingestion boundary
//!
//! Upstream fetchers hand over raw JSON; everything past this module works
//! with typed records. Numeric fields frequently arrive as strings
//! ("19.5", "-110"), so coercion is explicit: a value that will not coerce
//! becomes `None` for that field (and is logged), never a dead record.

mod injuries;
mod odds;
mod players;
mod projections;
mod stats;

pub use injuries::{parse_injuries, InjuryRecord};
pub use odds::{select_odds, OddsUpdate};
pub use players::{parse_players, PlayerBatch, PlayerRecord};
pub use projections::{parse_projection, projection_key, ProjectionRecord};
pub use stats::{flatten_stat_entries, parse_stat_record, GameStatRecord, StatEntry};

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Errors raised at the ingestion boundary. Top-level shape errors abort the
/// command; the per-record variants become batch failure entries.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("expected a JSON array at the top level")]
    ExpectedArray,
    #[error("expected a JSON object at the top level")]
    ExpectedObject,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unparseable game id `{0}`")]
    BadGameId(String),
    #[error("no known odds provider in payload (tried {0})")]
    NoOddsProvider(String),
}

/// Coerce a JSON value to f64: numbers pass through, numeric strings are
/// parsed. Anything else is `None`.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Integer counterpart of [`coerce_f64`].
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Pull a numeric field off a record, logging when a present value refuses
/// to coerce. Absent and null fields are silently `None`.
fn numeric_field(obj: &Value, field: &'static str) -> Option<f64> {
    match obj.get(field) {
        None | Some(Value::Null) => None,
        Some(v) => {
            let coerced = coerce_f64(v);
            if coerced.is_none() {
                warn!(field, raw = %v, "field refused numeric coercion, storing NULL");
            }
            coerced
        }
    }
}

fn str_field(obj: &Value, field: &str) -> Option<String> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn required_str(obj: &Value, field: &'static str) -> Result<String, FeedError> {
    str_field(obj, field).ok_or(FeedError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coercion_handles_numbers_strings_and_junk() {
        assert_eq!(coerce_f64(&json!(19.5)), Some(19.5));
        assert_eq!(coerce_f64(&json!("19.5")), Some(19.5));
        assert_eq!(coerce_f64(&json!("-110")), Some(-110.0));
        assert_eq!(coerce_f64(&json!("+150")), Some(150.0));
        assert_eq!(coerce_f64(&json!(" 7 ")), Some(7.0));
        assert_eq!(coerce_f64(&json!("N/A")), None);
        assert_eq!(coerce_f64(&json!(null)), None);
        assert_eq!(coerce_f64(&json!({})), None);

        assert_eq!(coerce_i64(&json!("42")), Some(42));
        assert_eq!(coerce_i64(&json!(42)), Some(42));
        assert_eq!(coerce_i64(&json!("forty-two")), None);
    }

    #[test]
    fn bad_numeric_field_is_null_not_fatal() {
        let obj = json!({"pts": "banana", "reb": "11"});
        assert_eq!(numeric_field(&obj, "pts"), None);
        assert_eq!(numeric_field(&obj, "reb"), Some(11.0));
        assert_eq!(numeric_field(&obj, "ast"), None);
    }
}
