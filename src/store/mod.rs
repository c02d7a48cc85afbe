//! SQLite-backed record store
//!
//! All writes are natural-key upserts: the key is fixed at first sighting,
//! non-key fields are fully overwritten on every subsequent sync (absent
//! optionals become NULL, not preserved), and the audit columns are
//! system-managed — `created_at` set once, `updated_at` refreshed per call.

mod schema;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::feed::{GameStatRecord, OddsUpdate, PlayerRecord, ProjectionRecord};

pub use schema::SCHEMA;

/// Result of an odds fan-out. A game with no projections is a no-op, not a
/// failure.
#[derive(Debug, PartialEq, Eq)]
pub enum EnrichOutcome {
    NoMatch,
    Updated(usize),
}

pub struct StatStore {
    conn: Connection,
}

impl StatStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ============================================
    // PLAYERS
    // ============================================

    /// Upsert a player by external id. Idempotent: the same record twice
    /// leaves exactly one row in the same state.
    pub fn upsert_player(&self, player: &PlayerRecord) -> Result<()> {
        self.conn.execute(
            r#"INSERT INTO players (player_id, name, position, team, team_id, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, datetime('now'), datetime('now'))
               ON CONFLICT(player_id) DO UPDATE SET
                   name = excluded.name,
                   position = excluded.position,
                   team = excluded.team,
                   team_id = excluded.team_id,
                   updated_at = datetime('now')"#,
            params![
                player.player_id,
                player.name,
                player.position,
                player.team,
                player.team_id,
            ],
        )?;
        Ok(())
    }

    pub fn list_player_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT player_id FROM players ORDER BY player_id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get_player(&self, player_id: &str) -> Result<Option<PlayerRow>> {
        let row = self.conn.query_row(
            r#"SELECT player_id, name, position, team, team_id, created_at, updated_at
               FROM players WHERE player_id = ?"#,
            params![player_id],
            |row| {
                Ok(PlayerRow {
                    player_id: row.get(0)?,
                    name: row.get(1)?,
                    position: row.get(2)?,
                    team: row.get(3)?,
                    team_id: row.get(4)?,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            },
        );

        match row {
            Ok(r) => Ok(Some(r)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ============================================
    // GAME STAT LINES
    // ============================================

    /// Upsert one stat line by the composite (game_id, player_id) key. The
    /// stored `id` is the deterministic "{game_id}:{player_id}".
    pub fn upsert_game_stat(&self, stat: &GameStatRecord) -> Result<()> {
        let id = format!("{}:{}", stat.game_id, stat.player_id);

        self.conn.execute(
            r#"INSERT INTO game_stats
               (id, game_id, player_id, team, opponent, is_home, game_date,
                minutes, points, rebounds, offensive_rebounds, defensive_rebounds,
                assists, steals, blocks, turnovers, personal_fouls,
                field_goals_made, field_goals_attempted, field_goal_pct,
                three_pointers_made, three_pointers_attempted, three_point_pct,
                free_throws_made, free_throws_attempted, free_throw_pct,
                plus_minus, fantasy_points, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                       ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))
               ON CONFLICT(game_id, player_id) DO UPDATE SET
                   team = excluded.team,
                   opponent = excluded.opponent,
                   is_home = excluded.is_home,
                   game_date = excluded.game_date,
                   minutes = excluded.minutes,
                   points = excluded.points,
                   rebounds = excluded.rebounds,
                   offensive_rebounds = excluded.offensive_rebounds,
                   defensive_rebounds = excluded.defensive_rebounds,
                   assists = excluded.assists,
                   steals = excluded.steals,
                   blocks = excluded.blocks,
                   turnovers = excluded.turnovers,
                   personal_fouls = excluded.personal_fouls,
                   field_goals_made = excluded.field_goals_made,
                   field_goals_attempted = excluded.field_goals_attempted,
                   field_goal_pct = excluded.field_goal_pct,
                   three_pointers_made = excluded.three_pointers_made,
                   three_pointers_attempted = excluded.three_pointers_attempted,
                   three_point_pct = excluded.three_point_pct,
                   free_throws_made = excluded.free_throws_made,
                   free_throws_attempted = excluded.free_throws_attempted,
                   free_throw_pct = excluded.free_throw_pct,
                   plus_minus = excluded.plus_minus,
                   fantasy_points = excluded.fantasy_points,
                   updated_at = datetime('now')"#,
            params![
                id,
                stat.game_id,
                stat.player_id,
                stat.team,
                stat.opponent,
                stat.is_home,
                stat.game_date.to_rfc3339(),
                stat.minutes,
                stat.points,
                stat.rebounds,
                stat.offensive_rebounds,
                stat.defensive_rebounds,
                stat.assists,
                stat.steals,
                stat.blocks,
                stat.turnovers,
                stat.personal_fouls,
                stat.field_goals_made,
                stat.field_goals_attempted,
                stat.field_goal_pct,
                stat.three_pointers_made,
                stat.three_pointers_attempted,
                stat.three_point_pct,
                stat.free_throws_made,
                stat.free_throws_attempted,
                stat.free_throw_pct,
                stat.plus_minus,
                stat.fantasy_points,
            ],
        )?;
        Ok(())
    }

    pub fn get_game_stat(&self, game_id: &str, player_id: &str) -> Result<Option<GameStatRow>> {
        let row = self.conn.query_row(
            r#"SELECT id, game_id, player_id, team, opponent, is_home, game_date,
                      points, rebounds, assists, fantasy_points, created_at, updated_at
               FROM game_stats WHERE game_id = ? AND player_id = ?"#,
            params![game_id, player_id],
            |row| {
                Ok(GameStatRow {
                    id: row.get(0)?,
                    game_id: row.get(1)?,
                    player_id: row.get(2)?,
                    team: row.get(3)?,
                    opponent: row.get(4)?,
                    is_home: row.get(5)?,
                    game_date: row.get(6)?,
                    points: row.get(7)?,
                    rebounds: row.get(8)?,
                    assists: row.get(9)?,
                    fantasy_points: row.get(10)?,
                    created_at: row.get(11)?,
                    updated_at: row.get(12)?,
                })
            },
        );

        match row {
            Ok(r) => Ok(Some(r)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn count_game_stats(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM game_stats", [], |row| row.get(0))
            .map_err(Into::into)
    }

    // ============================================
    // PROJECTIONS
    // ============================================

    /// Upsert a projection by external id. Odds columns are not touched
    /// here; they belong to the enrichment pass.
    pub fn upsert_projection(&self, projection: &ProjectionRecord) -> Result<()> {
        self.conn.execute(
            r#"INSERT INTO projections
               (projection_id, player_name, team, position, stat_type, line_score,
                average, max_value, game_id, start_time, status, description,
                image_url, odds_type, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))
               ON CONFLICT(projection_id) DO UPDATE SET
                   player_name = excluded.player_name,
                   team = excluded.team,
                   position = excluded.position,
                   stat_type = excluded.stat_type,
                   line_score = excluded.line_score,
                   average = excluded.average,
                   max_value = excluded.max_value,
                   game_id = excluded.game_id,
                   start_time = excluded.start_time,
                   status = excluded.status,
                   description = excluded.description,
                   image_url = excluded.image_url,
                   odds_type = excluded.odds_type,
                   updated_at = datetime('now')"#,
            params![
                projection.projection_id,
                projection.player_name,
                projection.team,
                projection.position,
                projection.stat_type,
                projection.line_score,
                projection.average,
                projection.max_value,
                projection.game_id,
                projection.start_time.to_rfc3339(),
                projection.status,
                projection.description,
                projection.image_url,
                projection.odds_type,
            ],
        )?;
        Ok(())
    }

    /// Fan an odds patch out to every projection of a game. Checks for
    /// matches first; a game nobody projected is `NoMatch`, not an error.
    /// The update itself is one statement, so all matched rows change or
    /// none do.
    pub fn attach_odds(&self, game_id: &str, odds: &OddsUpdate) -> Result<EnrichOutcome> {
        let matching: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM projections WHERE game_id = ?",
            params![game_id],
            |row| row.get(0),
        )?;

        if matching == 0 {
            return Ok(EnrichOutcome::NoMatch);
        }

        let updated = self.conn.execute(
            r#"UPDATE projections SET
                   odds_home_team = ?,
                   odds_away_team = ?,
                   odds_home_spread = ?,
                   odds_away_spread = ?,
                   odds_total_over = ?,
                   odds_total_under = ?,
                   odds_home_moneyline = ?,
                   odds_away_moneyline = ?,
                   odds_provider = ?,
                   odds_updated_at = ?,
                   updated_at = datetime('now')
               WHERE game_id = ?"#,
            params![
                odds.home_team,
                odds.away_team,
                odds.home_spread,
                odds.away_spread,
                odds.total_over,
                odds.total_under,
                odds.home_moneyline,
                odds.away_moneyline,
                odds.provider,
                odds.last_updated.to_rfc3339(),
                game_id,
            ],
        )?;

        Ok(EnrichOutcome::Updated(updated))
    }

    /// Retention pass: delete projections whose start time is strictly
    /// before `now` (captured once by the caller at invocation start).
    ///
    /// Stored instants are uniform RFC 3339 UTC strings, so lexicographic
    /// comparison is chronological.
    pub fn delete_expired_projections(&self, now: DateTime<Utc>) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM projections WHERE start_time < ?",
            params![now.to_rfc3339()],
        )?;
        Ok(deleted)
    }

    /// Distinct (game_id, team) pairs referenced by stored projections,
    /// for matching odds-API games onto our game ids.
    pub fn list_projection_games(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT game_id, team FROM projections WHERE game_id != 'N/A'",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Upcoming projections for one player, for the injury join.
    pub fn list_future_projections(
        &self,
        player_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ProjectionRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROJECTION_COLUMNS} FROM projections
             WHERE player_name = ? AND start_time >= ?
             ORDER BY start_time"
        ))?;
        let rows = stmt.query_map(params![player_name, now.to_rfc3339()], projection_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get_projection(&self, projection_id: &str) -> Result<Option<ProjectionRow>> {
        let row = self.conn.query_row(
            &format!("SELECT {PROJECTION_COLUMNS} FROM projections WHERE projection_id = ?"),
            params![projection_id],
            projection_from_row,
        );

        match row {
            Ok(r) => Ok(Some(r)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn count_projections(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM projections", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

const PROJECTION_COLUMNS: &str = "projection_id, player_name, team, position, stat_type, \
     line_score, average, max_value, game_id, start_time, status, \
     odds_home_team, odds_away_team, odds_home_spread, odds_away_spread, \
     odds_total_over, odds_total_under, odds_home_moneyline, \
     odds_away_moneyline, odds_provider, odds_updated_at, created_at, updated_at";

fn projection_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProjectionRow> {
    Ok(ProjectionRow {
        projection_id: row.get(0)?,
        player_name: row.get(1)?,
        team: row.get(2)?,
        position: row.get(3)?,
        stat_type: row.get(4)?,
        line_score: row.get(5)?,
        average: row.get(6)?,
        max_value: row.get(7)?,
        game_id: row.get(8)?,
        start_time: row.get(9)?,
        status: row.get(10)?,
        odds_home_team: row.get(11)?,
        odds_away_team: row.get(12)?,
        odds_home_spread: row.get(13)?,
        odds_away_spread: row.get(14)?,
        odds_total_over: row.get(15)?,
        odds_total_under: row.get(16)?,
        odds_home_moneyline: row.get(17)?,
        odds_away_moneyline: row.get(18)?,
        odds_provider: row.get(19)?,
        odds_updated_at: row.get(20)?,
        created_at: row.get(21)?,
        updated_at: row.get(22)?,
    })
}

// ============================================
// ROW TYPES
// ============================================

#[derive(Debug)]
pub struct PlayerRow {
    pub player_id: String,
    pub name: String,
    pub position: String,
    pub team: String,
    pub team_id: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug)]
pub struct GameStatRow {
    pub id: String,
    pub game_id: String,
    pub player_id: String,
    pub team: Option<String>,
    pub opponent: String,
    pub is_home: bool,
    pub game_date: String,
    pub points: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub fantasy_points: Option<f64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug)]
pub struct ProjectionRow {
    pub projection_id: String,
    pub player_name: String,
    pub team: String,
    pub position: String,
    pub stat_type: String,
    pub line_score: f64,
    pub average: Option<f64>,
    pub max_value: Option<f64>,
    pub game_id: String,
    pub start_time: String,
    pub status: String,
    pub odds_home_team: Option<String>,
    pub odds_away_team: Option<String>,
    pub odds_home_spread: Option<f64>,
    pub odds_away_spread: Option<f64>,
    pub odds_total_over: Option<f64>,
    pub odds_total_under: Option<f64>,
    pub odds_home_moneyline: Option<f64>,
    pub odds_away_moneyline: Option<f64>,
    pub odds_provider: Option<String>,
    pub odds_updated_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
