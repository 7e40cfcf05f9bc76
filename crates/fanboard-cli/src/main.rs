//! Fanboard CLI - share fan stories from the terminal
//!
//! Works against the local board and merges with the remote store whenever
//! one is configured and reachable.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::common::BoardOptions;
use crate::commands::like::run_like;
use crate::commands::list::run_list;
use crate::commands::stats::run_stats;
use crate::commands::submit::run_submit;
use crate::commands::sync::run_sync;
use crate::commands::watch::run_watch;
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

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "fanboard=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = BoardOptions::resolve(cli.db_path, cli.remote_url, cli.ephemeral);

    match cli.command {
        Commands::List { sort, limit, json } => {
            run_list(sort.into(), limit, json, &options).await?;
        }
        Commands::Submit {
            author,
            title,
            content,
        } => {
            run_submit(&author, &title, &content, &options).await?;
        }
        Commands::Like { id } => {
            run_like(&id, &options).await?;
        }
        Commands::Stats { json } => {
            run_stats(json, &options).await?;
        }
        Commands::Sync => run_sync(&options).await?,
        Commands::Watch { sort, limit } => run_watch(sort.into(), limit, &options).await?,
    }

    Ok(())
}
