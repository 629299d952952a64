//! Record persistence for the SqliteStore.

use async_trait::async_trait;
use log::debug;

use super::SqliteStore;
use crate::{
    error::Result,
    models::{ActivityId, ActivityRecord, DeliveredJob},
    services::RecordStore,
};

#[async_trait]
impl RecordStore for SqliteStore {
    async fn persist_activity(&self, record: &ActivityRecord) -> Result<ActivityId> {
        let record = record.clone();
        let id = self.with_db(move |db| db.insert_activity(&record)).await?;
        debug!("Saved activity {id}");
        Ok(id)
    }

    async fn persist_delivery_record(&self, record: &DeliveredJob) -> Result<()> {
        let record = record.clone();
        let job_id = record.job_id;
        self.with_db(move |db| db.insert_delivered(&record)).await?;
        debug!("Saved delivery record for job {job_id}");
        Ok(())
    }
}
