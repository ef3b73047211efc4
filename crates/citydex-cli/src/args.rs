use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for citydex
#[derive(Debug, Parser)]
#[command(
    name = "citydex",
    version,
    about = "CLI for browsing and searching the citydex city catalog"
)]
pub struct CliArgs {
    /// Path to a local cities.json or cities.json.gz dataset
    /// (default: fetch the upstream dataset over HTTP)
    #[arg(short = 'i', long = "input", global = true)]
    pub input: Option<PathBuf>,

    /// Directory holding persisted favorites (default: platform data dir)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the loaded catalog
    Stats,

    /// List cities in display order
    List {
        /// Maximum number of cities to print
        #[arg(short = 'n', long = "limit", default_value_t = 20)]
        limit: usize,
    },

    /// Search cities by name prefix (case-insensitive)
    Search {
        /// Prefix to search; an empty string lists everything
        prefix: String,
    },

    /// Toggle a city id in the favorites set
    Fav {
        /// City id as assigned by the dataset
        id: i64,
    },

    /// List favorited cities
    Favorites,
}
