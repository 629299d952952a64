//! Waypoint CLI Application
//!
//! Command-line interface for the delivery-driver checkpoint workflow.

mod args;
mod cli;
mod console;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use waypoint_core::{params::ListJobs, StoreBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let store = StoreBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to open the job store")?;

    let cli = Cli::new(store, TerminalRenderer::new(!no_color));

    info!("Waypoint started");

    match command {
        Some(Job { command }) => cli.handle_job_command(command).await,
        Some(Drive(args)) => cli.drive(args).await,
        Some(History(args)) => cli.history(&args).await,
        None => cli.list_jobs(&ListJobs { status: None }).await,
    }
}
