use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use courtside::cli::{injuries, odds, players, projections, prune, stats};
use courtside::config::Config;
use courtside::store::StatStore;

#[derive(Parser)]
#[command(name = "courtside")]
#[command(about = "NBA stats, player, and projection sync into a local SQLite store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "courtside.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Upsert the player list from a JSON file
    SyncPlayers {
        /// JSON array of player records
        file: PathBuf,
    },

    /// Upsert game stat lines from a JSON file
    SyncStats {
        /// JSON object: player id -> game id -> box score
        file: PathBuf,
    },

    /// Upsert projections from a JSON file
    SyncProjections {
        /// JSON array of projection records
        file: PathBuf,

        /// Skip the expired-projection prune that normally runs first
        #[arg(long)]
        keep_expired: bool,
    },

    /// Attach a game's betting odds to all of its projections
    AttachOdds {
        /// Stored game id, or an odds-API YYYYMMDD_AWAY@HOME id
        game_id: String,

        /// JSON file with the game's odds payload
        file: PathBuf,
    },

    /// Delete projections whose start time has already passed
    Prune,

    /// Join an injury report against stored players and their upcoming projections
    Injuries {
        /// JSON array of injury entries
        file: PathBuf,
    },

    /// Print the stored player ids as JSON
    ListPlayers,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        // stdout carries the JSON summary; diagnostics stay on stderr.
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        println!(
            "{}",
            serde_json::json!({"success": false, "error": format!("{e:#}")})
        );
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load config
    let config = Config::load(&cli.config).unwrap_or_default();

    // Initialize store
    let store = StatStore::open(&config.database_path())?;

    match cli.command {
        Commands::SyncPlayers { file } => players::run(&store, &file),
        Commands::SyncStats { file } => stats::run(&store, &file),
        Commands::SyncProjections { file, keep_expired } => {
            let prune_expired = config.retention.prune_on_sync && !keep_expired;
            projections::run(&store, &file, prune_expired)
        }
        Commands::AttachOdds { game_id, file } => odds::run(&store, &config, &game_id, &file),
        Commands::Prune => prune::run(&store),
        Commands::Injuries { file } => injuries::run(&store, &file),
        Commands::ListPlayers => players::list(&store),
    }
}
