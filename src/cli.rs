//! Command-line interface for lets_make_a_deal.

use clap::Parser;
use std::path::PathBuf;

/// Let's Make a Deal - play the three-door game against a HATEOAS server
#[derive(Parser, Debug)]
#[command(name = "lets_make_a_deal")]
#[command(about = "Hypermedia client for the Let's Make a Deal game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Game root URL (the only URL the client knows up front)
    #[arg(long, env = "DEAL_ROOT_URL")]
    pub root_url: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, default_value = "deal.toml")]
    pub config: PathBuf,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Play non-interactively with these door indices (e.g. "1,0")
    #[arg(long, value_delimiter = ',')]
    pub choices: Option<Vec<usize>>,

    /// Print the game's transition history at the end
    #[arg(long)]
    pub history: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
