//! Job registry queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_column, timestamp_column};
use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{Job, JobStatus, TransportType},
};

const INSERT_JOB_SQL: &str = "INSERT INTO jobs (transport, route, pickup_location, status, scheduled_at, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const JOB_COLUMNS: &str =
    "id, transport, route, pickup_location, status, scheduled_at, created_at, updated_at";
const UPDATE_JOB_STATUS_SQL: &str = "UPDATE jobs SET status = ?1, updated_at = ?2 WHERE id = ?3";

pub(crate) fn job_from_row(row: &Row<'_>) -> rusqlite::Result<Job> {
    Ok(Job {
        id: row.get::<_, i64>(0)? as u64,
        transport: parse_column::<TransportType>(row, 1)?,
        route: row.get(2)?,
        pickup_location: row.get(3)?,
        status: parse_column::<JobStatus>(row, 4)?,
        scheduled_at: timestamp_column(row, 5)?,
        created_at: timestamp_column(row, 6)?,
        updated_at: timestamp_column(row, 7)?,
    })
}

impl super::Database {
    /// Registers a job assigned to the driver.
    pub fn insert_job(
        &mut self,
        transport: TransportType,
        route: &str,
        pickup_location: &str,
        scheduled_at: Timestamp,
    ) -> Result<Job> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_JOB_SQL,
            params![
                transport.as_str(),
                route,
                pickup_location,
                JobStatus::Assigned.as_str(),
                scheduled_at.to_string(),
                &now_str,
                &now_str
            ],
        )
        .db_context("Failed to insert job")?;

        let id = tx.last_insert_rowid() as u64;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Job {
            id,
            transport,
            route: route.to_string(),
            pickup_location: pickup_location.to_string(),
            status: JobStatus::Assigned,
            scheduled_at,
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a job by its ID.
    pub fn get_job(&self, id: u64) -> Result<Option<Job>> {
        self.connection
            .query_row(
                &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1"),
                params![id as i64],
                job_from_row,
            )
            .optional()
            .db_context("Failed to query job")
    }

    /// Lists jobs by schedule, optionally restricted to one status.
    pub fn list_jobs(&self, status: Option<JobStatus>) -> Result<Vec<Job>> {
        let mut query = format!("SELECT {JOB_COLUMNS} FROM jobs");
        if status.is_some() {
            query.push_str(" WHERE status = ?1");
        }
        query.push_str(" ORDER BY scheduled_at, id");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let rows = match status {
            Some(status) => stmt.query_map(params![status.as_str()], job_from_row),
            None => stmt.query_map([], job_from_row),
        }
        .db_context("Failed to list jobs")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read job row")
    }

    /// Moves a job to `status`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::JobNotFound` for an unknown ID.
    pub fn set_job_status(&self, id: u64, status: JobStatus) -> Result<Job> {
        let updated = self
            .connection
            .execute(
                UPDATE_JOB_STATUS_SQL,
                params![status.as_str(), Timestamp::now().to_string(), id as i64],
            )
            .db_context("Failed to update job status")?;

        if updated == 0 {
            return Err(WorkflowError::JobNotFound { id });
        }

        self.get_job(id)?.ok_or(WorkflowError::JobNotFound { id })
    }
}
