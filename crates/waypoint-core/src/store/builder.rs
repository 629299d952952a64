//! Builder for creating and configuring SqliteStore instances.

use std::path::{Path, PathBuf};

use log::debug;

use super::SqliteStore;
use crate::error::{Result, WorkflowError};

/// Builder for creating and configuring SqliteStore instances.
#[derive(Debug, Clone, Default)]
pub struct StoreBuilder {
    database_path: Option<PathBuf>,
}

impl StoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/waypoint/waypoint.db` or
    /// `~/.local/share/waypoint/waypoint.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the store, creating the database file and schema if needed.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::FileSystem` if the parent directory cannot be
    /// created, `WorkflowError::XdgDirectory` if no default path can be
    /// resolved and `WorkflowError::Database` if initialization fails
    pub async fn build(self) -> Result<SqliteStore> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WorkflowError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let store = SqliteStore::new(db_path);
        store.with_db(|_| Ok(())).await?;
        debug!("Opened store at {}", store.db_path.display());
        Ok(store)
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("waypoint")
            .place_data_file("waypoint.db")
            .map_err(|e| WorkflowError::XdgDirectory(e.to_string()))
    }
}
