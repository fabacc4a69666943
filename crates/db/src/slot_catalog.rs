//! PostgreSQL-backed [`SlotCatalog`] used by the availability query.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use salonbook_core::availability::SlotCatalog;
use salonbook_core::models::{service::Service, staff::Staff, time_slot::TimeSlot};
use uuid::Uuid;

use crate::models::convert_all;
use crate::repositories::{service, staff, time_slot};
use crate::DbPool;

/// Reads straight from the pool; availability never locks.
#[derive(Debug, Clone)]
pub struct PgSlotCatalog {
    pool: DbPool,
}

impl PgSlotCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotCatalog for PgSlotCatalog {
    async fn service(&self, service_id: Uuid) -> eyre::Result<Option<Service>> {
        let row = service::get_service_by_id(&self.pool, service_id).await?;
        Ok(row.map(Service::from))
    }

    async fn staff(&self, staff_id: Uuid) -> eyre::Result<Option<Staff>> {
        let row = staff::get_staff_by_id(&self.pool, staff_id).await?;
        Ok(row.map(Staff::from))
    }

    async fn staff_offering(&self, service_id: Uuid) -> eyre::Result<Vec<Uuid>> {
        staff::get_staff_ids_offering(&self.pool, service_id).await
    }

    async fn free_slots(
        &self,
        staff_ids: &[Uuid],
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> eyre::Result<Vec<TimeSlot>> {
        let rows = time_slot::get_free_slots(&self.pool, staff_ids, from, to).await?;
        convert_all(rows)
    }
}
