use async_trait::async_trait;
use chrono::NaiveDateTime;
use mockall::mock;
use salonbook_core::availability::SlotCatalog;
use salonbook_core::models::{service::Service, staff::Staff, time_slot::TimeSlot};
use uuid::Uuid;

// Mock catalog for availability tests
mock! {
    pub Catalog {}

    #[async_trait]
    impl SlotCatalog for Catalog {
        async fn service(&self, service_id: Uuid) -> eyre::Result<Option<Service>>;

        async fn staff(&self, staff_id: Uuid) -> eyre::Result<Option<Staff>>;

        async fn staff_offering(&self, service_id: Uuid) -> eyre::Result<Vec<Uuid>>;

        async fn free_slots(
            &self,
            staff_ids: &[Uuid],
            from: NaiveDateTime,
            to: NaiveDateTime,
        ) -> eyre::Result<Vec<TimeSlot>>;
    }
}
