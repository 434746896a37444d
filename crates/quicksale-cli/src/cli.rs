use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(name = "quicksale")]
#[command(about = "Record point-of-sale transactions, online or offline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the local queue database
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the CLI config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Treat the device as offline: skip every remote call
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a sale
    Sell {
        /// SKU name
        #[arg(long)]
        sku: String,
        /// Quantity sold (fractions allowed)
        #[arg(long = "qty")]
        quantity: Decimal,
        /// Price per unit
        #[arg(long)]
        price: Decimal,
    },
    /// Send sales saved offline to the server
    Flush,
    /// Show sales waiting to be synced
    Pending {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show today's sales and total
    Today {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export today's sales as CSV
    Export {
        /// Output path
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Manage the SKU catalog
    Skus {
        #[command(subcommand)]
        command: SkuCommands,
    },
    /// Keep flushing offline sales whenever the server is reachable
    Watch,
    /// Manage CLI configuration
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
pub enum SkuCommands {
    /// List SKUs (active only unless --all)
    List {
        /// Include disabled SKUs
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a SKU to the catalog
    Add {
        /// SKU name
        name: String,
    },
    /// Make a SKU available for sale
    Enable {
        /// SKU id
        id: i64,
    },
    /// Hide a SKU from the sale picker
    Disable {
        /// SKU id
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create or update the config file
    Init {
        /// Supabase project URL
        #[arg(long, value_name = "URL")]
        supabase_url: Option<String>,
        /// Supabase anon key
        #[arg(long, value_name = "KEY")]
        supabase_anon_key: Option<String>,
        /// Default path to the local queue database
        #[arg(long = "queue-db", value_name = "PATH")]
        queue_db: Option<PathBuf>,
    },
    /// Print the effective configuration
    Show,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
