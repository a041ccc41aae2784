//! Command-line arguments

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use smart_tables::column::ColumnFamily;

#[derive(Parser)]
#[command(name = "smart-tables")]
#[command(about = "Render polymorphic user tables in the terminal", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log files from earlier runs to keep
    #[arg(long, global = true, default_value_t = 10)]
    pub keep_logs: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a page of rows as a text table
    Render(RenderArgs),
    /// Print the columns composed for a batch of rows
    Columns(ColumnsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Family {
    Users,
    Imported,
}

impl From<Family> for ColumnFamily {
    fn from(family: Family) -> Self {
        match family {
            Family::Users => ColumnFamily::Users,
            Family::Imported => ColumnFamily::ImportedUsers,
        }
    }
}

#[derive(Args)]
pub struct RenderArgs {
    /// JSON array of user rows
    #[arg(long)]
    pub rows: PathBuf,

    /// JSON object mapping wallet address to live balances
    #[arg(long)]
    pub wallets: Option<PathBuf>,

    /// JSON object mapping row id to its last chat message
    #[arg(long)]
    pub messages: Option<PathBuf>,

    /// Grid configuration; defaults to config.json in the config directory
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON file of user-defined columns and their values by row id
    #[arg(long)]
    pub custom: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Family::Users)]
    pub family: Family,

    /// Append the chat activity columns
    #[arg(long)]
    pub chat: bool,

    /// Column key to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Filter as FIELD:OP:VALUE, e.g. portfolioValue:gt:1000
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    #[arg(long)]
    pub search: Option<String>,

    /// 1-based page number
    #[arg(long)]
    pub page: Option<usize>,

    /// Rows per page, e.g. 10, 15, 25, 50 or 100
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Switch to load-more paging and press "load more" N times
    #[arg(long)]
    pub load_more: Option<usize>,

    /// Terminal width in characters
    #[arg(long, default_value_t = 120)]
    pub width: usize,

    /// Scrollable columns to skip
    #[arg(long, default_value_t = 0)]
    pub scroll: usize,

    /// Seconds to wait for wallet and message data
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

#[derive(Args)]
pub struct ColumnsArgs {
    /// JSON array of user rows
    #[arg(long)]
    pub rows: PathBuf,

    #[arg(long, value_enum, default_value_t = Family::Users)]
    pub family: Family,

    #[arg(long)]
    pub chat: bool,
}
