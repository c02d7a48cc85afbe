pub mod batch;
pub mod cli;
pub mod clock;
pub mod config;
pub mod feed;
pub mod matchup;
pub mod store;

pub use config::Config;
pub use store::StatStore;
