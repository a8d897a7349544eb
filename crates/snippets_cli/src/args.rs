//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "snippets", version)]
#[command(about = "Store and retrieve snippets of text", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// SQLite database file holding the snippets
    #[arg(long, global = true, env = "SNIPPETS_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, global = true, env = "SNIPPETS_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true, env = "SNIPPETS_LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store a snippet
    Put {
        /// The name of the snippet
        name: String,
        /// The snippet text
        snippet: String,
    },

    /// Retrieve a snippet
    Get {
        /// The name of the snippet
        name: String,
    },

    /// List available keywords
    Catalog,

    /// Retrieve snippets containing a substring
    Search {
        /// The substring to look for, case-insensitively
        string: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Put { .. } => "put",
            Self::Get { .. } => "get",
            Self::Catalog => "catalog",
            Self::Search { .. } => "search",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
