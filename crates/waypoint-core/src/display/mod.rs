//! Markdown rendering of jobs, records and the live session.
//!
//! Domain models implement `Display` directly; collections and composite
//! views go through newtype wrappers. Everything renders to markdown, which
//! the CLI hands to its terminal renderer.
//!
//! - [`collections`]: `Jobs`, `History` and `Activities`
//! - [`results`]: `CreateResult` and `ConfirmResult`
//! - [`progress`]: `SessionProgress`, the driver's step list
//! - [`status`]: `OperationStatus`
//! - [`datetime`]: `LocalDateTime`
//! - [`models`]: Display implementations for domain models
//!
//! ```rust
//! use waypoint_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Run sheet set to RS-001".to_string());
//! assert_eq!(status.to_string(), "Success: Run sheet set to RS-001\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod progress;
pub mod results;
pub mod status;

pub use collections::{Activities, History, Jobs};
pub use datetime::LocalDateTime;
pub use progress::SessionProgress;
pub use results::{ConfirmResult, CreateResult};
pub use status::OperationStatus;
