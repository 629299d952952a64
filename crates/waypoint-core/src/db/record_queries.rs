//! Activity and delivery-record queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_column, timestamp_column};
use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{
        ActivityId, ActivityPhoto, ActivityRecord, ConfirmedAt, DeliveredJob, DeliveryStatus,
        EncodedImage, JobStatus, PhotoSlot, StepKind, TransportType,
    },
};

const INSERT_ACTIVITY_SQL: &str = "INSERT INTO activities (job_id, step, confirmed_date, confirmed_time, confirmed_at, address, run_sheet, incident_type) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const INSERT_PHOTO_SQL: &str =
    "INSERT INTO activity_photos (activity_id, slot, content_type, data) VALUES (?1, ?2, ?3, ?4)";
const SELECT_ACTIVITIES_SQL: &str = "SELECT id, job_id, step, confirmed_date, confirmed_time, confirmed_at, address, run_sheet, incident_type FROM activities WHERE job_id = ?1 ORDER BY id";
const SELECT_PHOTOS_SQL: &str =
    "SELECT slot, content_type, data FROM activity_photos WHERE activity_id = ?1 ORDER BY slot";
const INSERT_DELIVERED_SQL: &str = "INSERT INTO delivered_jobs (job_id, run_sheet, pickup_time, delivery_time, route, transport, date, status, incident_type, incident_time, incident_address, recorded_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)";
const MARK_DELIVERED_SQL: &str = "UPDATE jobs SET status = ?1, updated_at = ?2 WHERE id = ?3";
const DELIVERED_COLUMNS: &str = "job_id, run_sheet, pickup_time, delivery_time, route, transport, date, status, incident_type, incident_time, incident_address";

fn delivered_from_row(row: &Row<'_>) -> rusqlite::Result<DeliveredJob> {
    Ok(DeliveredJob {
        job_id: row.get::<_, i64>(0)? as u64,
        run_sheet: row.get(1)?,
        pickup_time: row.get(2)?,
        delivery_time: row.get(3)?,
        route: row.get(4)?,
        transport: parse_column::<TransportType>(row, 5)?,
        date: row.get(6)?,
        status: parse_column::<DeliveryStatus>(row, 7)?,
        incident_type: row.get(8)?,
        incident_time: row.get(9)?,
        incident_address: row.get(10)?,
    })
}

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<(i64, ActivityRecord)> {
    let record = ActivityRecord {
        job_id: row.get::<_, i64>(1)? as u64,
        step: parse_column::<StepKind>(row, 2)?,
        confirmed_at: ConfirmedAt {
            date: row.get(3)?,
            time: row.get(4)?,
            instant: timestamp_column(row, 5)?,
        },
        address: row.get(6)?,
        run_sheet: row.get(7)?,
        incident_type: row.get(8)?,
        photos: Vec::new(),
    };
    Ok((row.get(0)?, record))
}

fn photo_from_row(row: &Row<'_>) -> rusqlite::Result<ActivityPhoto> {
    Ok(ActivityPhoto {
        slot: parse_column::<PhotoSlot>(row, 0)?,
        image: EncodedImage::new(row.get::<_, String>(1)?, row.get::<_, Vec<u8>>(2)?),
    })
}

impl super::Database {
    /// Saves one step confirmation with its photos.
    pub fn insert_activity(&mut self, record: &ActivityRecord) -> Result<ActivityId> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            INSERT_ACTIVITY_SQL,
            params![
                record.job_id as i64,
                record.step.as_str(),
                &record.confirmed_at.date,
                &record.confirmed_at.time,
                record.confirmed_at.instant.to_string(),
                record.address.as_deref(),
                record.run_sheet.as_deref(),
                record.incident_type.as_deref(),
            ],
        )
        .db_context("Failed to insert activity")?;

        let id = tx.last_insert_rowid();
        for photo in &record.photos {
            tx.execute(
                INSERT_PHOTO_SQL,
                params![
                    id,
                    photo.slot.to_string(),
                    &photo.image.content_type,
                    &photo.image.bytes
                ],
            )
            .db_context("Failed to insert activity photo")?;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(ActivityId(id as u64))
    }

    /// Activities of a job in confirmation order, photos included.
    pub fn list_activities(&self, job_id: u64) -> Result<Vec<ActivityRecord>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ACTIVITIES_SQL)
            .db_context("Failed to prepare query")?;
        let rows = stmt
            .query_map(params![job_id as i64], activity_from_row)
            .db_context("Failed to list activities")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read activity row")?;

        let mut photos = self
            .connection
            .prepare(SELECT_PHOTOS_SQL)
            .db_context("Failed to prepare query")?;

        let mut records = Vec::with_capacity(rows.len());
        for (id, mut record) in rows {
            record.photos = photos
                .query_map(params![id], photo_from_row)
                .db_context("Failed to list activity photos")?
                .collect::<rusqlite::Result<Vec<_>>>()
                .db_context("Failed to read activity photo")?;
            records.push(record);
        }
        Ok(records)
    }

    /// Saves a delivery record and marks its job delivered, atomically.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::JobNotFound` when the job is not registered;
    /// nothing is written in that case.
    pub fn insert_delivered(&mut self, record: &DeliveredJob) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now().to_string();
        let updated = tx
            .execute(
                MARK_DELIVERED_SQL,
                params![JobStatus::Delivered.as_str(), &now, record.job_id as i64],
            )
            .db_context("Failed to mark job delivered")?;
        if updated == 0 {
            return Err(WorkflowError::JobNotFound { id: record.job_id });
        }

        tx.execute(
            INSERT_DELIVERED_SQL,
            params![
                record.job_id as i64,
                &record.run_sheet,
                &record.pickup_time,
                &record.delivery_time,
                &record.route,
                record.transport.as_str(),
                &record.date,
                record.status.as_str(),
                record.incident_type.as_deref(),
                record.incident_time.as_deref(),
                record.incident_address.as_deref(),
                &now,
            ],
        )
        .db_context("Failed to insert delivery record")?;

        tx.commit().db_context("Failed to commit transaction")
    }

    /// Delivery record of one job.
    pub fn get_delivered(&self, job_id: u64) -> Result<Option<DeliveredJob>> {
        self.connection
            .query_row(
                &format!("SELECT {DELIVERED_COLUMNS} FROM delivered_jobs WHERE job_id = ?1"),
                params![job_id as i64],
                delivered_from_row,
            )
            .optional()
            .db_context("Failed to query delivery record")
    }

    /// Delivery records, most recent first.
    pub fn list_delivered(&self, limit: Option<u32>) -> Result<Vec<DeliveredJob>> {
        let mut query = format!(
            "SELECT {DELIVERED_COLUMNS} FROM delivered_jobs ORDER BY id DESC"
        );
        if let Some(limit) = limit {
            query.push_str(&format!(" LIMIT {limit}"));
        }

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let rows = stmt
            .query_map([], delivered_from_row)
            .db_context("Failed to list delivery records")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read delivery record row")
    }
}
