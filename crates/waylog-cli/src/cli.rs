use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "waylog")]
#[command(about = "Keep a travel journal from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new draft entry
    #[command(alias = "new")]
    Add {
        /// Entry title
        title: String,
        /// Location label (e.g. "Kyoto, Japan")
        #[arg(short, long, value_name = "PLACE")]
        location: String,
        /// Longitude of the location
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Latitude of the location
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Body text (stdin or $EDITOR when omitted)
        body: Vec<String>,
    },
    /// List recent entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Include archived entries
        #[arg(long)]
        archived: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a full entry
    Show {
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Edit an entry's body in $EDITOR
    Edit {
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Clear the draft flag so the next sync publishes the entry
    Publish {
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Archive an entry (soft delete, mirrored on sync)
    Archive {
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Permanently delete a draft that was never pushed
    Delete {
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Reconcile local entries with the remote content repository
    Sync {
        /// Run even if the last sync completed recently
        #[arg(long)]
        force: bool,
    },
    /// Configure the remote content repository
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update the remote repository settings
    Init {
        /// Repository owner (user or organization)
        #[arg(long, value_name = "OWNER")]
        owner: String,
        /// Repository name
        #[arg(long, value_name = "REPO")]
        repo: String,
        /// Target branch (default: main)
        #[arg(long, value_name = "BRANCH")]
        branch: Option<String>,
        /// Folder holding entry files (default: entries)
        #[arg(long, value_name = "FOLDER")]
        folder: Option<String>,
        /// API token; prefer the WAYLOG_GITHUB_TOKEN env variable
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
    },
    /// Show the current remote settings
    Show,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
