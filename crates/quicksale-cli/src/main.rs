//! Quick Sale CLI - record sales from the terminal
//!
//! Sales go straight to the server when it is reachable and are kept in a
//! local queue otherwise, to be flushed on the next run or by `watch`.

mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::common::{AppContext, ContextOptions};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::export::run_export;
use crate::commands::flush::run_flush;
use crate::commands::pending::run_pending;
use crate::commands::sell::run_sell;
use crate::commands::skus::run_skus;
use crate::commands::today::run_today;
use crate::commands::watch::run_watch;
use crate::config::CliConfig;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_directive()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
        Commands::Config { command } => run_config(command, cli.config.as_deref()),
        command => {
            let config = CliConfig::load(cli.config.as_deref())?;
            let options = ContextOptions {
                db_path: config.resolve_db_path(cli.db_path),
                force_offline: cli.offline,
            };
            let context = AppContext::open(&config, &options).await?;
            context.startup_flush().await?;

            match command {
                Commands::Sell {
                    sku,
                    quantity,
                    price,
                } => run_sell(&context, &sku, quantity, price).await,
                Commands::Flush => run_flush(&context).await,
                Commands::Pending { json } => run_pending(&context, json).await,
                Commands::Today { json } => run_today(&context, json).await,
                Commands::Export { output } => run_export(&context, output.as_deref()).await,
                Commands::Skus { command } => run_skus(&context, command).await,
                Commands::Watch => run_watch(context).await,
                Commands::Completions { .. } | Commands::Config { .. } => Ok(()),
            }
        }
    }
}

fn default_directive() -> Directive {
    "quicksale=info"
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into())
}

#[cfg(test)]
mod tests;
