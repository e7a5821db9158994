use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "unifinder")]
#[command(about = "Search universities by country and keep a list of favorites")]
pub struct Cli {
    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Directory where favorites are stored")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Print results as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the universities of a country; favorites are marked with '*'
    Search {
        #[arg(default_value = "Togo")]
        country: String,
    },
    /// List every university known to the directory
    All {
        #[arg(long, help = "Print at most this many results")]
        limit: Option<usize>,
    },
    /// Manage saved favorites
    #[command(subcommand)]
    Favorites(FavoritesCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum FavoritesCommand {
    /// List favorites in the order they were added
    List,
    /// Save a university from a country's search results
    Add { country: String, name: String },
    /// Remove a favorite by id
    Remove { id: String },
    /// Report whether a university is a favorite
    Check { country: String, name: String },
    /// Add the university if it is not a favorite, remove it otherwise
    Toggle { country: String, name: String },
}
