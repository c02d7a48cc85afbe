//! Odds-API game matching
//!
//! The odds endpoint keys games as `YYYYMMDD_AWAY@HOME` while projections
//! carry their own game ids, so the bridge is the pair of team
//! abbreviations. Feeds disagree on some abbreviations (PHX vs PHO, GSW vs
//! GS), hence the variant table.

use std::collections::{HashMap, HashSet};

/// Alternate spellings seen across feeds for the same franchise.
const TEAM_VARIANTS: &[(&str, &[&str])] = &[
    ("PHX", &["PHO", "PHOENIX", "SUNS"]),
    ("GSW", &["GS", "GOLDEN", "WARRIORS"]),
    ("SAC", &["SACRAMENTO", "KINGS"]),
    ("LAL", &["LAKERS", "LOS ANGELES L"]),
    ("LAC", &["CLIPPERS", "LOS ANGELES C"]),
    ("NYK", &["NY", "KNICKS", "NEW YORK"]),
    ("BKN", &["BRK", "BROOKLYN", "NETS"]),
    ("NOP", &["NO", "PELICANS", "NEW ORLEANS"]),
    ("SAS", &["SA", "SPURS", "SAN ANTONIO"]),
    ("CHI", &["CHICAGO", "BULLS"]),
    ("CLE", &["CLEVELAND", "CAVALIERS", "CAVS"]),
    ("DET", &["DETROIT", "PISTONS"]),
    ("IND", &["INDIANA", "PACERS"]),
    ("MIL", &["MILWAUKEE", "BUCKS"]),
    ("ATL", &["ATLANTA", "HAWKS"]),
    ("CHA", &["CHARLOTTE", "HORNETS"]),
    ("MIA", &["MIAMI", "HEAT"]),
    ("ORL", &["ORLANDO", "MAGIC"]),
    ("WAS", &["WASHINGTON", "WIZARDS"]),
    ("DEN", &["DENVER", "NUGGETS"]),
    ("MIN", &["MINNESOTA", "TIMBERWOLVES"]),
    ("OKC", &["OKLAHOMA", "THUNDER"]),
    ("POR", &["PORTLAND", "TRAIL BLAZERS"]),
    ("UTA", &["UTAH", "JAZZ"]),
    ("BOS", &["BOSTON", "CELTICS"]),
    ("PHI", &["PHILADELPHIA", "76ERS", "SIXERS"]),
    ("TOR", &["TORONTO", "RAPTORS"]),
    ("DAL", &["DALLAS", "MAVERICKS", "MAVS"]),
    ("HOU", &["HOUSTON", "ROCKETS"]),
    ("MEM", &["MEMPHIS", "GRIZZLIES"]),
];

/// All abbreviations that could mean the same team as `abbr`.
fn variants(abbr: &str) -> HashSet<String> {
    let upper = abbr.to_uppercase();
    let mut set = HashSet::from([upper.clone()]);

    for (canonical, alts) in TEAM_VARIANTS {
        if *canonical == upper || alts.iter().any(|a| *a == upper) {
            set.insert(canonical.to_string());
            set.extend(alts.iter().map(|a| a.to_string()));
        }
    }

    set
}

/// Index of stored projection games by the teams that reference them.
pub struct GameIndex {
    team_to_game: HashMap<String, String>,
    game_teams: HashMap<String, HashSet<String>>,
}

impl GameIndex {
    /// Build from (game_id, team) pairs as returned by the store.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut team_to_game = HashMap::new();
        let mut game_teams: HashMap<String, HashSet<String>> = HashMap::new();

        for (game_id, team) in pairs {
            let abbr = team.to_uppercase();
            team_to_game.insert(abbr.clone(), game_id.clone());
            game_teams.entry(game_id.clone()).or_default().insert(abbr);
        }

        Self {
            team_to_game,
            game_teams,
        }
    }

    /// Map an odds-API `YYYYMMDD_AWAY@HOME` id onto a stored game id: one
    /// team must match on one side and a team of the same stored game on
    /// the other.
    pub fn match_odds_game(&self, api_game_id: &str) -> Option<String> {
        let (_, teams_part) = api_game_id.split_once('_')?;
        let (away, home) = teams_part.split_once('@')?;

        let home_variations = variants(home);
        let away_variations = variants(away);

        for (abbr, game_id) in &self.team_to_game {
            let Some(others) = self.game_teams.get(game_id) else {
                continue;
            };

            if home_variations.contains(abbr)
                && others.iter().any(|t| away_variations.contains(t))
            {
                return Some(game_id.clone());
            }
            if away_variations.contains(abbr)
                && others.iter().any(|t| home_variations.contains(t))
            {
                return Some(game_id.clone());
            }
        }

        None
    }
}
