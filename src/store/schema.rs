//! SQLite schema definition
//!
//! Natural keys carry the uniqueness guarantees: players by external player
//! id, stat lines by (game_id, player_id), projections by external
//! projection id. Odds live denormalized on the projection row so a game's
//! odds fan out to every projection of that game with one UPDATE.

pub const SCHEMA: &str = r#"
-- ============================================
-- PLAYERS
-- ============================================

CREATE TABLE IF NOT EXISTS players (
    player_id TEXT PRIMARY KEY,            -- stable external id
    name TEXT NOT NULL,
    position TEXT NOT NULL,
    team TEXT NOT NULL,
    team_id TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME
);

-- ============================================
-- GAME STAT LINES
-- ============================================

-- One row per player per game. `id` is the derived "{game_id}:{player_id}".
CREATE TABLE IF NOT EXISTS game_stats (
    id TEXT PRIMARY KEY,
    game_id TEXT NOT NULL,
    player_id TEXT NOT NULL,
    team TEXT,
    opponent TEXT NOT NULL,
    is_home BOOLEAN NOT NULL DEFAULT FALSE,
    game_date DATETIME NOT NULL,
    minutes REAL,
    points REAL,
    rebounds REAL,
    offensive_rebounds REAL,
    defensive_rebounds REAL,
    assists REAL,
    steals REAL,
    blocks REAL,
    turnovers REAL,
    personal_fouls REAL,
    field_goals_made REAL,
    field_goals_attempted REAL,
    field_goal_pct REAL,
    three_pointers_made REAL,
    three_pointers_attempted REAL,
    three_point_pct REAL,
    free_throws_made REAL,
    free_throws_attempted REAL,
    free_throw_pct REAL,
    plus_minus REAL,
    fantasy_points REAL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME,
    UNIQUE(game_id, player_id),
    FOREIGN KEY(player_id) REFERENCES players(player_id)
);

-- ============================================
-- PROJECTIONS
-- ============================================

-- Betting projections, enriched in a later pass with game odds.
CREATE TABLE IF NOT EXISTS projections (
    projection_id TEXT PRIMARY KEY,        -- external id
    player_name TEXT NOT NULL,
    team TEXT NOT NULL,
    position TEXT NOT NULL,
    stat_type TEXT NOT NULL,
    line_score REAL NOT NULL,
    average REAL,
    max_value REAL,
    game_id TEXT NOT NULL,
    start_time DATETIME NOT NULL,
    status TEXT NOT NULL,
    description TEXT,
    image_url TEXT,
    odds_type TEXT,
    odds_home_team TEXT,
    odds_away_team TEXT,
    odds_home_spread REAL,
    odds_away_spread REAL,
    odds_total_over REAL,
    odds_total_under REAL,
    odds_home_moneyline REAL,
    odds_away_moneyline REAL,
    odds_provider TEXT,
    odds_updated_at DATETIME,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME
);

-- ============================================
-- INDEXES
-- ============================================

CREATE INDEX IF NOT EXISTS idx_game_stats_player ON game_stats(player_id);
CREATE INDEX IF NOT EXISTS idx_game_stats_date ON game_stats(game_date);

CREATE INDEX IF NOT EXISTS idx_projections_game ON projections(game_id);
CREATE INDEX IF NOT EXISTS idx_projections_start ON projections(start_time);
CREATE INDEX IF NOT EXISTS idx_projections_player ON projections(player_name);
"#;
