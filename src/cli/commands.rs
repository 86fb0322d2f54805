//! CLI commands and argument parsing

use crate::cli::input::IdList;
use crate::config::ROOT_DIRECTORY_ID;
use crate::types::TrafficOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for 123Pan cloud storage
#[derive(Parser, Debug)]
#[command(name = "pan-cli")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Token file holding credentials and the cached access token
    #[arg(short, long, global = true)]
    pub token_file: Option<PathBuf>,

    /// API host (overrides config and PAN_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the files of a folder, following every page
    Files {
        /// Folder to list (0 = drive root)
        #[arg(short, long, default_value_t = ROOT_DIRECTORY_ID)]
        parent: i64,

        /// Items per page (1-100)
        #[arg(short, long)]
        limit: Option<u32>,

        /// Search keyword
        #[arg(long)]
        search: Option<String>,

        /// Search mode
        #[arg(long)]
        search_mode: Option<String>,
    },

    /// Show the details of one file
    Info {
        /// File ID
        id: i64,
    },

    /// Move files into another folder
    Move {
        /// File IDs, e.g. `3,7,10-12`
        ids: IdList,

        /// Destination folder ID
        #[arg(long)]
        to: i64,
    },

    /// Rename a file
    Rename {
        /// File ID
        id: i64,

        /// New file name
        name: String,
    },

    /// Move files to the trash
    Trash {
        /// File IDs, e.g. `3,7,10-12`
        ids: IdList,
    },

    /// Permanently delete trashed files
    Delete {
        /// File IDs, e.g. `3,7,10-12`
        ids: IdList,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Restore files from the trash
    Recover {
        /// File IDs, e.g. `3,7,10-12`
        ids: IdList,
    },

    /// Manage direct links
    DirectLink {
        #[command(subcommand)]
        action: DirectLinkAction,
    },

    /// List share links, following every page
    Shares {
        /// Items per page (1-100)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Create a share link
    ShareCreate {
        /// File IDs, e.g. `3,7,10-12`
        ids: IdList,

        /// Share name
        #[arg(short, long)]
        name: String,

        /// Validity in days (1, 7, 30, or 0 for permanent)
        #[arg(short, long, default_value_t = 7)]
        expire: u32,

        /// Extraction code
        #[arg(long)]
        password: Option<String>,

        #[command(flatten)]
        traffic: TrafficArgs,
    },

    /// Change the traffic settings of share links
    ShareUpdate {
        /// Share IDs, e.g. `3,7,10-12`
        ids: IdList,

        #[command(flatten)]
        traffic: TrafficArgs,
    },
}

/// Direct link actions
#[derive(Subcommand, Debug)]
pub enum DirectLinkAction {
    /// Enable direct-link access
    Enable {
        /// File ID
        id: i64,
    },
    /// Disable direct-link access
    Disable {
        /// File ID
        id: i64,
    },
    /// Print the direct link of a file
    Get {
        /// File ID
        id: i64,
    },
}

/// Share traffic flags
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficArgs {
    /// Charge downloads through the link to your traffic
    #[arg(long)]
    pub traffic: bool,

    /// Cap that traffic, in bytes
    #[arg(long, requires = "traffic")]
    pub traffic_limit: Option<u64>,
}

impl From<TrafficArgs> for TrafficOptions {
    fn from(args: TrafficArgs) -> Self {
        Self {
            enabled: args.traffic,
            limit_bytes: args.traffic_limit,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}
