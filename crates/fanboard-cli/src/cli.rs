use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fanboard_core::SortKey;

#[derive(Parser)]
#[command(name = "fanboard")]
#[command(about = "Share fan stories from the command line, online or off")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Remote story endpoint (overrides FANBOARD_REMOTE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub remote_url: Option<String>,

    /// Keep the board in memory only; nothing is written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List stories
    #[command(alias = "ls")]
    List {
        /// Display order
        #[arg(short, long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,
        /// Number of stories to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Submit a new story
    #[command(alias = "add")]
    Submit {
        /// Author name
        #[arg(short, long)]
        author: String,
        /// Story title
        #[arg(short, long)]
        title: String,
        /// Story text (read from stdin when omitted)
        content: Vec<String>,
    },
    /// Like a story, or take the like back
    Like {
        /// Story ID
        id: String,
    },
    /// Show board statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Merge stories from the remote store into the local board
    Sync,
    /// Keep the board open, resyncing in the background and reprinting on change
    Watch {
        /// Display order
        #[arg(short, long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,
        /// Number of stories to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SortArg {
    Newest,
    Popular,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Newest => Self::Newest,
            SortArg::Popular => Self::Popular,
        }
    }
}
