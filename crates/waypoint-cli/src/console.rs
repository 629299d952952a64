//! Line-oriented driver console for `wp drive`.
//!
//! Each line of stdin is one command against the active [`Workflow`]. Photos
//! are read from files: a binary PGM is checked for blur, any other file is
//! attached as-is.

use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use waypoint_core::{
    display::{ConfirmResult, History, OperationStatus, SessionProgress},
    models::{EncodedImage, IncidentType, PhotoSlot},
    services::{BlurDecision, Camera, CaptureContext, CapturedFrame},
    sharpness::LumaFrame,
    workflow::Workflow,
    WorkflowError,
};

use crate::renderer::TerminalRenderer;

const HELP: &str = "\
### Commands

- `status`: show the checkpoints and what the current one needs
- `photo <slot> <file>`: capture a photo; blurry PGM frames are rejected
- `photo! <slot> <file>`: capture a photo and keep it even when blurry
- `clear <slot>`: remove a photo
- `runsheet <number>`: enter the run-sheet number
- `scan <payload>`: read the run-sheet number from a QR payload
- `delay on|off`: report whether the trip is delayed
- `incident <type> [description]`: select the incident type
- `confirm`: confirm the current checkpoint
- `retry`: retry records that failed to save
- `history`: deliveries completed in this session
- `cancel`: abandon the job
- `quit`: leave the console
";

/// Camera fed from files named on the console.
#[derive(Debug, Default)]
pub struct ConsoleCamera {
    next: Mutex<Option<PathBuf>>,
    accept_blurry: Mutex<bool>,
    rejected: Mutex<Option<f64>>,
}

impl ConsoleCamera {
    /// Queue the file the next capture returns.
    pub fn load(&self, path: PathBuf, accept_blurry: bool) {
        *self.next.lock() = Some(path);
        *self.accept_blurry.lock() = accept_blurry;
        *self.rejected.lock() = None;
    }

    /// Variance of the last frame turned down as blurry.
    pub fn take_rejected(&self) -> Option<f64> {
        self.rejected.lock().take()
    }
}

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("pgm") => "image/x-portable-graymap",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl Camera for ConsoleCamera {
    async fn capture(&self, slot: PhotoSlot, _context: &CaptureContext) -> Option<CapturedFrame> {
        let path = self.next.lock().take()?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Cannot read photo for {slot} from {}: {e}", path.display());
                return None;
            }
        };

        let preview = if bytes.starts_with(b"P5") {
            match LumaFrame::from_pgm(&bytes) {
                Ok(frame) => Some(frame),
                Err(e) => {
                    warn!("Skipping blur check for {}: {e}", path.display());
                    None
                }
            }
        } else {
            None
        };

        Some(CapturedFrame {
            image: EncodedImage::new(content_type(&path), bytes),
            preview,
        })
    }

    async fn review_blurry(&self, slot: PhotoSlot, variance: f64) -> BlurDecision {
        if *self.accept_blurry.lock() {
            return BlurDecision::Accept;
        }
        debug!("Rejecting blurry photo for {slot}");
        *self.rejected.lock() = Some(variance);
        BlurDecision::Cancel
    }
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Status,
    Photo {
        slot: PhotoSlot,
        path: PathBuf,
        accept_blurry: bool,
    },
    Clear(PhotoSlot),
    RunSheet(String),
    Scan(String),
    Delay(bool),
    Incident {
        kind: IncidentType,
        description: Option<String>,
    },
    Confirm,
    Retry,
    History,
    Cancel,
    Help,
    Quit,
}

impl Command {
    /// Parse a console line; `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "" => return Ok(None),
            "status" | "s" => Command::Status,
            "photo" | "photo!" => {
                let (slot, path) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| format!("usage: {word} <slot> <file>"))?;
                Command::Photo {
                    slot: slot.parse()?,
                    path: PathBuf::from(path.trim()),
                    accept_blurry: word == "photo!",
                }
            }
            "clear" => Command::Clear(rest.parse()?),
            "runsheet" | "rs" => Command::RunSheet(rest.to_string()),
            "scan" => Command::Scan(rest.to_string()),
            "delay" => match rest {
                "on" | "yes" => Command::Delay(true),
                "off" | "no" => Command::Delay(false),
                _ => return Err("usage: delay on|off".to_string()),
            },
            "incident" => {
                let (kind, description) = match rest.split_once(char::is_whitespace) {
                    Some((kind, description)) => (kind, Some(description.trim().to_string())),
                    None => (rest, None),
                };
                Command::Incident {
                    kind: kind.parse()?,
                    description,
                }
            }
            "confirm" | "c" => Command::Confirm,
            "retry" => Command::Retry,
            "history" => Command::History,
            "cancel" => Command::Cancel,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command '{other}'. Type `help` for a list.")),
        };
        Ok(Some(command))
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Reads commands from stdin until the job is delivered or abandoned.
pub struct Console<'a> {
    workflow: Workflow,
    camera: Arc<ConsoleCamera>,
    renderer: &'a TerminalRenderer,
}

impl<'a> Console<'a> {
    pub fn new(
        workflow: Workflow,
        camera: Arc<ConsoleCamera>,
        renderer: &'a TerminalRenderer,
    ) -> Self {
        Self {
            workflow,
            camera,
            renderer,
        }
    }

    pub async fn run(&self) -> Result<()> {
        self.show_status().await?;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("wp> ");
            std::io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => None,
            };
            let Some(line) = line else {
                println!();
                break;
            };

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    self.fail(message)?;
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => {
                    let rejected_input = e
                        .downcast_ref::<WorkflowError>()
                        .is_some_and(WorkflowError::is_input_error);
                    if !rejected_input {
                        warn!("Command failed: {e:#}");
                    }
                    self.fail(e.to_string())?;
                }
            }
        }

        self.farewell().await
    }

    async fn execute(&self, command: Command) -> Result<Flow> {
        match command {
            Command::Status => self.show_status().await?,
            Command::Photo {
                slot,
                path,
                accept_blurry,
            } => {
                self.camera.load(path, accept_blurry);
                if self.workflow.capture_photo(slot).await? {
                    self.ok(format!("Captured {} `{slot}`", slot.label()));
                } else if let Some(variance) = self.camera.take_rejected() {
                    self.warn(format!(
                        "Photo for `{slot}` is blurry (variance {variance:.1}); \
                         use `photo!` to keep it"
                    ));
                } else {
                    self.warn(format!("No photo captured for `{slot}`"));
                }
            }
            Command::Clear(slot) => {
                if self.workflow.clear_photo(slot).await?.is_some() {
                    self.ok(format!("Cleared `{slot}`"));
                } else {
                    self.warn(format!("`{slot}` had no photo"));
                }
            }
            Command::RunSheet(value) => {
                self.workflow.set_run_sheet(&value).await?;
                let session = self.workflow.snapshot().await;
                self.ok(format!("Run sheet set to {}", session.run_sheet()));
            }
            Command::Scan(payload) => {
                let value = self.workflow.scan_run_sheet(&payload).await?;
                self.ok(format!("Run sheet set to {value}"));
            }
            Command::Delay(delayed) => {
                self.workflow.set_delayed(delayed).await?;
                self.ok(format!("Delayed: {}", if delayed { "yes" } else { "no" }));
            }
            Command::Incident { kind, description } => {
                self.workflow.select_incident(kind).await?;
                if let Some(description) = description {
                    self.workflow.describe_incident(&description).await?;
                }
                self.ok(format!("Incident: {}", kind.label()));
            }
            Command::Confirm => {
                let confirmation = self.workflow.confirm().await?;
                self.render(&ConfirmResult(&confirmation).to_string());
                if confirmation.delivered().is_some() {
                    return Ok(Flow::Quit);
                }
                self.show_status().await?;
            }
            Command::Retry => {
                let report = self.workflow.retry_pending().await;
                if report.remaining() == 0 {
                    self.ok(format!("Saved {} queued record(s)", report.saved));
                } else {
                    for error in &report.errors {
                        self.warn(error.to_string());
                    }
                    self.warn(format!(
                        "Saved {}, {} still queued",
                        report.saved,
                        report.remaining()
                    ));
                }
            }
            Command::History => self.render(&History(self.workflow.history()).to_string()),
            Command::Cancel => {
                let job = self.workflow.cancel().await?;
                self.ok(format!("Abandoned job {}", job.id));
                return Ok(Flow::Quit);
            }
            Command::Help => self.render(HELP),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn show_status(&self) -> Result<()> {
        let session = self.workflow.snapshot().await;
        let pending = self.workflow.pending_saves();
        self.renderer
            .render(&SessionProgress::new(&session, &pending).to_string())
    }

    async fn farewell(&self) -> Result<()> {
        let pending = self.workflow.pending_saves();
        if !pending.is_empty() {
            self.renderer.render(
                &OperationStatus::warning(format!(
                    "{} record(s) were never saved and are lost",
                    pending.len()
                ))
                .to_string(),
            )?;
        }
        if let Some(job) = self.workflow.snapshot().await.job() {
            self.renderer.render(
                &OperationStatus::warning(format!(
                    "Job {} left unfinished; start it again to continue",
                    job.id
                ))
                .to_string(),
            )?;
        }
        Ok(())
    }

    fn render(&self, markdown: &str) {
        if let Err(e) = self.renderer.render(markdown) {
            warn!("Failed to render output: {e}");
        }
    }

    fn ok(&self, message: String) {
        self.render(&OperationStatus::success(message).to_string());
    }

    fn warn(&self, message: String) {
        self.render(&OperationStatus::warning(message).to_string());
    }

    fn fail(&self, message: String) -> Result<()> {
        self.renderer
            .render(&OperationStatus::failure(message).to_string())
    }
}
