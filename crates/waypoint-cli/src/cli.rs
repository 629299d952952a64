//! Command-line argument wrappers and the command handler.
//!
//! Argument structs carry the clap attributes; each converts into the core
//! parameter type with a `From` impl so the core stays free of clap:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → SqliteStore / Workflow
//! ```

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use jiff::Timestamp;
use log::info;
use waypoint_core::{
    config::DEFAULT_LOCATION_TIMEOUT,
    display::{Activities, CreateResult, History, Jobs, OperationStatus},
    models::{Coordinate, JobStatus, TransportType},
    params::{AssignJob, Id, ListHistory, ListJobs},
    services::{LocationProvider, NoLocation, StaticLocation, SystemClock},
    SqliteStore, WorkflowBuilder, WorkflowConfig,
};

use crate::{
    console::{Console, ConsoleCamera},
    renderer::TerminalRenderer,
};

/// Register a job assigned to the driver
#[derive(Args)]
pub struct AssignJobArgs {
    #[arg(short, long, value_enum, help = "Kind of haul")]
    pub transport: TransportArg,
    #[arg(short, long, help = "Route description, e.g. 'Bangkok DC → Chiang Mai Hub'")]
    pub route: String,
    #[arg(short, long, help = "Where the goods are collected")]
    pub pickup: String,
    #[arg(
        short,
        long,
        help = "Scheduled start as an RFC 3339 timestamp; defaults to now"
    )]
    pub scheduled: Option<Timestamp>,
}

impl From<AssignJobArgs> for AssignJob {
    fn from(val: AssignJobArgs) -> Self {
        AssignJob {
            transport: val.transport.into(),
            route: val.route,
            pickup_location: val.pickup,
            scheduled_at: val.scheduled,
        }
    }
}

/// List jobs, optionally filtered by status
#[derive(Args)]
pub struct ListJobsArgs {
    #[arg(short, long, value_enum, help = "Only show jobs with this status")]
    pub status: Option<JobStatusArg>,
}

impl From<ListJobsArgs> for ListJobs {
    fn from(val: ListJobsArgs) -> Self {
        ListJobs {
            status: val.status.map(Into::into),
        }
    }
}

/// Show a job with its confirmed steps and delivery record
#[derive(Args)]
pub struct ShowJobArgs {
    #[arg(help = "Unique identifier of the job to show")]
    pub id: u64,
}

impl From<ShowJobArgs> for Id {
    fn from(val: ShowJobArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Args)]
pub struct HistoryArgs {
    #[arg(short = 'n', long, help = "Show at most this many deliveries")]
    pub limit: Option<u32>,
    #[arg(long, help = "Print the delivery records as JSON")]
    pub json: bool,
}

impl From<&HistoryArgs> for ListHistory {
    fn from(val: &HistoryArgs) -> Self {
        ListHistory { limit: val.limit }
    }
}

/// Start a job and work through its checkpoints interactively
///
/// Without `--lat`/`--lng` no location is available and steps are confirmed
/// without an address.
#[derive(Args)]
pub struct DriveArgs {
    #[arg(help = "Unique identifier of the job to drive")]
    pub job_id: u64,
    #[arg(long, requires = "lng", allow_hyphen_values = true, help = "Device latitude")]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_hyphen_values = true, help = "Device longitude")]
    pub lng: Option<f64>,
    #[arg(long, requires = "lat", help = "Address the position resolves to")]
    pub address: Option<String>,
    #[arg(long, default_value = "en", help = "Language for resolved addresses")]
    pub lang: String,
    #[arg(
        long,
        default_value_t = DEFAULT_LOCATION_TIMEOUT.as_secs(),
        help = "Seconds allowed for each location lookup"
    )]
    pub location_timeout: u64,
    #[arg(long, help = "Laplacian variance below which a photo counts as blurry")]
    pub blur_threshold: Option<f64>,
}

impl DriveArgs {
    fn config(&self) -> WorkflowConfig {
        let config = WorkflowConfig::default()
            .with_lang(self.lang.clone())
            .with_location_timeout(Duration::from_secs(self.location_timeout));
        match self.blur_threshold {
            Some(threshold) => config.with_blur_threshold(threshold),
            None => config,
        }
    }

    fn location(&self) -> Result<Arc<dyn LocationProvider>> {
        let (Some(lat), Some(lng)) = (self.lat, self.lng) else {
            return Ok(Arc::new(NoLocation));
        };
        let location = StaticLocation::new(Coordinate::new(lat, lng)?);
        Ok(match &self.address {
            Some(address) => Arc::new(location.with_label(address.clone())),
            None => Arc::new(location),
        })
    }
}

#[derive(Subcommand)]
pub enum JobCommands {
    /// Register a job assigned to the driver
    #[command(alias = "a")]
    Assign(AssignJobArgs),
    /// List jobs
    #[command(alias = "l")]
    List(ListJobsArgs),
    /// Show a job with its confirmed steps
    #[command(alias = "s")]
    Show(ShowJobArgs),
}

/// Command-line representation of the transport types
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    /// Line haul between hubs
    LongHaul,
    /// Collection from the shipper
    FirstMile,
}

impl From<TransportArg> for TransportType {
    fn from(val: TransportArg) -> Self {
        match val {
            TransportArg::LongHaul => TransportType::LongHaul,
            TransportArg::FirstMile => TransportType::FirstMile,
        }
    }
}

/// Command-line representation of the job statuses
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum JobStatusArg {
    Assigned,
    Pending,
    Delivered,
}

impl From<JobStatusArg> for JobStatus {
    fn from(val: JobStatusArg) -> Self {
        match val {
            JobStatusArg::Assigned => JobStatus::Assigned,
            JobStatusArg::Pending => JobStatus::Pending,
            JobStatusArg::Delivered => JobStatus::Delivered,
        }
    }
}

/// Runs one command against the store and renders the result.
pub struct Cli {
    store: Arc<SqliteStore>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(store: SqliteStore, renderer: TerminalRenderer) -> Self {
        Self {
            store: Arc::new(store),
            renderer,
        }
    }

    pub async fn handle_job_command(&self, command: JobCommands) -> Result<()> {
        match command {
            JobCommands::Assign(args) => self.assign_job(&args.into()).await,
            JobCommands::List(args) => self.list_jobs(&args.into()).await,
            JobCommands::Show(args) => self.show_job(&args.into()).await,
        }
    }

    async fn assign_job(&self, params: &AssignJob) -> Result<()> {
        let job = self
            .store
            .assign_job(params)
            .await
            .context("Failed to assign job")?;
        self.renderer.render(&CreateResult::new(job).to_string())
    }

    pub async fn list_jobs(&self, params: &ListJobs) -> Result<()> {
        let jobs = self
            .store
            .list_jobs(params)
            .await
            .context("Failed to list jobs")?;
        self.renderer.render(&Jobs(jobs).to_string())
    }

    async fn show_job(&self, params: &Id) -> Result<()> {
        let job = self.store.require_job(params).await?;
        let activities = self.store.list_activities(params).await?;
        let delivery = self.store.get_delivery(params).await?;

        let mut output = job.to_string();
        output.push_str("### Confirmed steps\n\n");
        output.push_str(&Activities(activities).to_string());
        if let Some(record) = delivery {
            output.push('\n');
            output.push_str(&record.to_string());
        }
        self.renderer.render(&output)
    }

    pub async fn history(&self, args: &HistoryArgs) -> Result<()> {
        let records = self
            .store
            .list_history(&args.into())
            .await
            .context("Failed to list deliveries")?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }
        self.renderer.render(&History(records).to_string())
    }

    /// Build the workflow, mark the job pending, start it and hand stdin to
    /// the console.
    ///
    /// The job status is only touched once the workflow has been built, so
    /// bad arguments leave the job as it was.
    pub async fn drive(&self, args: DriveArgs) -> Result<()> {
        let camera = Arc::new(ConsoleCamera::default());
        let workflow = WorkflowBuilder::new(self.store.clone())
            .with_clock(Arc::new(SystemClock))
            .with_location(args.location()?)
            .with_camera(camera.clone())
            .with_config(args.config())
            .build()?;

        let id = Id { id: args.job_id };
        let job = self.store.mark_job_pending(&id).await?;
        workflow.start(job).await?;

        info!("Driving job {}", args.job_id);
        self.renderer.render(
            &OperationStatus::success(format!("Started job {}", args.job_id)).to_string(),
        )?;
        Console::new(workflow, camera, &self.renderer).run().await
    }
}
