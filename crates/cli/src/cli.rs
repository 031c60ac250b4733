use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wordatro", about = "Wordatro screenshot analysis helper")]
pub struct Cli {
    /// Backend base URL; falls back to WORDATRO_BASE_URL, then wordatro.toml.
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a screenshot and print the stored filename.
    Upload { file: PathBuf },
    /// Upload a screenshot and show the analysis results.
    Analyze {
        file: PathBuf,
        #[arg(long)]
        dictionary: Option<String>,
        #[arg(long)]
        strategy: Option<String>,
        /// Invalidate any cached result for this request before fetching.
        #[arg(long, action = ArgAction::SetTrue)]
        refresh: bool,
    },
    /// Region-by-region inspection of an already-uploaded screenshot.
    Inspect {
        filename: String,
        #[arg(long)]
        dictionary: Option<String>,
        #[arg(long)]
        strategy: Option<String>,
    },
    /// List the dictionaries the server currently offers.
    Dictionaries,
    /// List the strategies the server currently offers.
    Strategies,
    /// Show or durably update the stored dictionary/strategy preference.
    Prefs {
        #[arg(long)]
        dictionary: Option<String>,
        #[arg(long)]
        strategy: Option<String>,
    },
}
