//! Timezone-safe timestamp handling
//!
//! Upstream feeds ship timestamps as `YYYY-MM-DDTHH:MM:SS±HH:MM` in the
//! timezone of the event. Parsing those with anything that consults the
//! server's local timezone shifts games across calendar dates, so the
//! components and the offset are pulled apart by hand and the instant is
//! computed directly.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tracing::warn;

use crate::feed::coerce_i64;

/// Parse an offset-qualified timestamp into an absolute instant.
///
/// The instant is the named wall-clock time corrected by the offset:
/// `2024-01-15T19:30:00-06:00` -> `2024-01-16T01:30:00Z`. Inputs that do not
/// match the expected shape fall back to a best-effort parse with a warning.
/// Empty input returns the current instant as a missing-data sentinel.
pub fn normalize_timestamp(raw: &str) -> DateTime<Utc> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Utc::now();
    }

    if let Some(instant) = parse_offset_timestamp(raw) {
        return instant;
    }

    fallback_parse(raw)
}

/// Strict parse of `YYYY-MM-DDTHH:MM:SS` followed by `Z` or `±HH:MM`.
fn parse_offset_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let bytes = raw.as_bytes();
    if bytes.len() < 20 {
        return None;
    }
    if bytes[4] != b'-' || bytes[7] != b'-' || bytes[10] != b'T' {
        return None;
    }
    if bytes[13] != b':' || bytes[16] != b':' {
        return None;
    }

    let year: i32 = raw.get(0..4)?.parse().ok()?;
    let month: u32 = raw.get(5..7)?.parse().ok()?;
    let day: u32 = raw.get(8..10)?.parse().ok()?;
    let hour: u32 = raw.get(11..13)?.parse().ok()?;
    let minute: u32 = raw.get(14..16)?.parse().ok()?;
    let second: u32 = raw.get(17..19)?.parse().ok()?;

    let offset_minutes: i64 = match raw.get(19..)? {
        "Z" | "z" => 0,
        rest => {
            let rest_bytes = rest.as_bytes();
            if rest_bytes.len() != 6 || rest_bytes[3] != b':' {
                return None;
            }
            let sign = match rest_bytes[0] {
                b'+' => 1,
                b'-' => -1,
                _ => return None,
            };
            let off_hour: i64 = rest.get(1..3)?.parse().ok()?;
            let off_min: i64 = rest.get(4..6)?.parse().ok()?;
            sign * (off_hour * 60 + off_min)
        }
    };

    let wall = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;

    // The components name a wall-clock time in the given offset; subtracting
    // the offset corrects to true UTC.
    Some(Utc.from_utc_datetime(&wall) - Duration::minutes(offset_minutes))
}

/// Best-effort fallback for timestamps outside the expected shape.
fn fallback_parse(raw: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        warn!(raw, "timestamp outside expected shape, parsed as RFC 3339");
        return dt.with_timezone(&Utc);
    }

    // Bare datetime without an offset: treat as UTC.
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        warn!(raw, "timestamp has no offset, assuming UTC");
        return Utc.from_utc_datetime(&naive);
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        warn!(raw, "timestamp has no offset, assuming UTC");
        return Utc.from_utc_datetime(&naive);
    }

    warn!(raw, "unparseable timestamp, substituting current instant");
    Utc::now()
}

/// Interpret an epoch value whose unit the upstream does not document.
///
/// Values at or above 10^12 can only be milliseconds for any date this
/// system handles; everything smaller is seconds. Missing or unparseable
/// input returns the current instant.
pub fn normalize_epoch(raw: Option<&serde_json::Value>) -> DateTime<Utc> {
    let epoch = match raw.and_then(coerce_i64) {
        Some(e) if e > 0 => e,
        _ => return Utc::now(),
    };

    let seconds = if epoch >= 1_000_000_000_000 { epoch / 1000 } else { epoch };
    Utc.timestamp_opt(seconds, 0).single().unwrap_or_else(Utc::now)
}

/// Parsed pieces of a `YYYYMMDD_AWAY@HOME` game identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct GameIdParts {
    pub game_date: DateTime<Utc>,
    pub opponent: String,
    pub is_home: bool,
}

/// Split a `YYYYMMDD_AWAY@HOME` game id into date, opponent, and home flag
/// from the perspective of `player_team`.
pub fn parse_game_id(game_id: &str, player_team: &str) -> Option<GameIdParts> {
    let (date_part, teams_part) = game_id.split_once('_')?;
    let (away_team, home_team) = teams_part.split_once('@')?;

    if date_part.len() != 8 {
        return None;
    }
    let year: i32 = date_part.get(0..4)?.parse().ok()?;
    let month: u32 = date_part.get(4..6)?.parse().ok()?;
    let day: u32 = date_part.get(6..8)?.parse().ok()?;
    let game_date =
        Utc.from_utc_datetime(&NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?);

    let is_home = player_team == home_team;
    // Unrecognized player team degrades to an away perspective: opponent is
    // the home side only when the player is on the away side.
    let opponent = if player_team == away_team { home_team } else { away_team };

    Some(GameIdParts {
        game_date,
        opponent: opponent.to_string(),
        is_home,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn offset_timestamp_becomes_utc_instant() {
        let instant = normalize_timestamp("2024-01-15T19:30:00-06:00");
        assert_eq!(instant.to_rfc3339(), "2024-01-16T01:30:00+00:00");
    }

    #[test]
    fn round_trip_preserves_wall_clock_in_source_offset() {
        let raw = "2024-01-15T19:30:00-06:00";
        let instant = normalize_timestamp(raw);
        let offset = chrono::FixedOffset::west_opt(6 * 3600).unwrap();
        let local = instant.with_timezone(&offset);
        assert_eq!(local.format("%Y-%m-%dT%H:%M:%S%:z").to_string(), raw);
        // Calendar date in the event's region is unchanged.
        assert_eq!(local.date_naive().to_string(), "2024-01-15");
    }

    #[test]
    fn positive_offset_and_zulu() {
        let plus = normalize_timestamp("2024-03-01T09:00:00+05:30");
        assert_eq!(plus.to_rfc3339(), "2024-03-01T03:30:00+00:00");

        let zulu = normalize_timestamp("2024-03-01T09:00:00Z");
        assert_eq!(zulu.to_rfc3339(), "2024-03-01T09:00:00+00:00");
    }

    #[test]
    fn empty_input_returns_now() {
        let before = Utc::now();
        let instant = normalize_timestamp("");
        let after = Utc::now();
        assert!(instant >= before && instant <= after);
    }

    #[test]
    fn malformed_input_falls_back_without_panicking() {
        // Bare datetime is treated as UTC.
        let naive = normalize_timestamp("2024-01-15T19:30:00");
        assert_eq!(naive.to_rfc3339(), "2024-01-15T19:30:00+00:00");

        // Garbage degrades to the current instant.
        let before = Utc::now();
        let garbage = normalize_timestamp("next tuesday");
        assert!(garbage >= before);
    }

    #[test]
    fn epoch_seconds_and_milliseconds_agree() {
        let secs = normalize_epoch(Some(&serde_json::json!(1705368600)));
        let millis = normalize_epoch(Some(&serde_json::json!(1705368600000i64)));
        assert_eq!(secs, millis);
        assert_eq!(secs.to_rfc3339(), "2024-01-16T01:30:00+00:00");

        // String-typed epochs coerce too.
        let s = normalize_epoch(Some(&serde_json::json!("1705368600")));
        assert_eq!(s, secs);
    }

    #[test]
    fn missing_epoch_returns_now() {
        let before = Utc::now();
        assert!(normalize_epoch(None) >= before);
        assert!(normalize_epoch(Some(&serde_json::json!(""))) >= before);
    }

    #[test]
    fn game_id_parses_date_opponent_and_home_flag() {
        let parts = parse_game_id("20240115_BOS@LAL", "LAL").unwrap();
        assert_eq!(parts.opponent, "BOS");
        assert!(parts.is_home);
        assert_eq!(parts.game_date.date_naive().to_string(), "2024-01-15");
        assert_eq!(parts.game_date.hour(), 0);

        let away = parse_game_id("20240115_BOS@LAL", "BOS").unwrap();
        assert_eq!(away.opponent, "LAL");
        assert!(!away.is_home);
    }

    #[test]
    fn unrecognized_team_defaults_to_away_perspective() {
        // A stat line with no team abbreviation records the away team as
        // the opponent.
        let parts = parse_game_id("20240115_BOS@LAL", "").unwrap();
        assert_eq!(parts.opponent, "BOS");
        assert!(!parts.is_home);
    }

    #[test]
    fn bad_game_id_is_none() {
        assert!(parse_game_id("20240115", "LAL").is_none());
        assert!(parse_game_id("not-a-date_BOS@LAL", "LAL").is_none());
    }
}
