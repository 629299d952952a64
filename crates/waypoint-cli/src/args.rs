use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{DriveArgs, HistoryArgs, JobCommands};

/// Checkpoint workflow for delivery drivers
///
/// Waypoint walks a driver through the checkpoints of a job: check-in,
/// pickup, departure, incident report, arrival and proof of delivery. Each
/// checkpoint is confirmed with its photos, stamped with the local time and
/// the current address, and the last one records the delivery.
#[derive(Parser)]
#[command(version, about, name = "wp")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/waypoint/waypoint.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Waypoint CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Manage assigned jobs
    #[command(alias = "j")]
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Work through the checkpoints of a job
    #[command(alias = "d")]
    Drive(DriveArgs),
    /// Show completed deliveries, newest first
    #[command(alias = "h")]
    History(HistoryArgs),
}
