//! # Availability Query
//!
//! Resolves which staff could perform a service, loads their free slots for
//! a window and runs the [finder](crate::finder) over them.
//!
//! Storage is abstracted behind [`SlotCatalog`] so the query can run against
//! PostgreSQL in production and against mocks in tests. An empty result is a
//! normal answer: "no staff offers this service" and "no slot fits" are not
//! distinguished.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::calendar::{slot_count, BookingPolicy, DateWindow, WeekPlan};
use crate::errors::{BookingError, BookingResult};
use crate::finder::find_runs;
use crate::models::availability::{AvailableStart, DayAvailability, WeekAvailability};
use crate::models::service::Service;
use crate::models::staff::Staff;
use crate::models::time_slot::TimeSlot;

/// Read-only view of the stored catalog and slot grid.
#[async_trait]
pub trait SlotCatalog: Send + Sync {
    async fn service(&self, service_id: Uuid) -> eyre::Result<Option<Service>>;

    async fn staff(&self, staff_id: Uuid) -> eyre::Result<Option<Staff>>;

    /// Ids of every staff member offering `service_id`.
    async fn staff_offering(&self, service_id: Uuid) -> eyre::Result<Vec<Uuid>>;

    /// Free slots of `staff_ids` starting in `[from, to)`, ordered by
    /// `(staff_id, start_time)`.
    async fn free_slots(
        &self,
        staff_ids: &[Uuid],
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> eyre::Result<Vec<TimeSlot>>;
}

/// Bookable start times for `service_id` inside `window`.
pub async fn available_starts<C>(
    catalog: &C,
    service_id: Uuid,
    staff_id: Option<Uuid>,
    window: &DateWindow,
) -> BookingResult<Vec<AvailableStart>>
where
    C: SlotCatalog + ?Sized,
{
    let service = load_service(catalog, service_id).await?;
    let candidates = candidate_staff(catalog, &service, staff_id).await?;
    if candidates.is_empty() {
        debug!("No staff offers service {}", service_id);
        return Ok(Vec::new());
    }

    let slots = load_slots(catalog, &candidates, window).await?;
    let starts = runs_for(&slots, &service)
        .into_iter()
        .map(|slot| AvailableStart {
            start_time: slot.start_time,
            staff_id: slot.staff_id,
        })
        .collect::<Vec<_>>();

    debug!(
        "Service {} has {} available starts between {} and {}",
        service_id,
        starts.len(),
        window.from,
        window.to
    );
    Ok(starts)
}

/// Day query: validates `date` against the booking horizon, then searches it.
pub async fn available_starts_on<C>(
    catalog: &C,
    service_id: Uuid,
    staff_id: Option<Uuid>,
    date: NaiveDate,
    now: NaiveDateTime,
    policy: &BookingPolicy,
) -> BookingResult<Vec<AvailableStart>>
where
    C: SlotCatalog + ?Sized,
{
    let window = DateWindow::day(date, now, policy)?;
    available_starts(catalog, service_id, staff_id, &window).await
}

/// Week query for the date picker: for each day of the resolved week,
/// whether at least one run exists.
pub async fn week_availability<C>(
    catalog: &C,
    service_id: Uuid,
    staff_id: Option<Uuid>,
    week_offset: i64,
    now: NaiveDateTime,
    policy: &BookingPolicy,
) -> BookingResult<WeekAvailability>
where
    C: SlotCatalog + ?Sized,
{
    let plan = WeekPlan::resolve(week_offset, now, policy);
    let service = load_service(catalog, service_id).await?;
    let candidates = candidate_staff(catalog, &service, staff_id).await?;

    let slots = if candidates.is_empty() {
        Vec::new()
    } else {
        load_slots(catalog, &candidates, &plan.window).await?
    };

    // Runs never cross midnight, so reducing per day over the week's slots
    // gives the same answer as seven separate day queries.
    let days = plan
        .days()
        .map(|date| {
            let day_slots: Vec<TimeSlot> = slots
                .iter()
                .filter(|slot| slot.start_time.date() == date)
                .cloned()
                .collect();
            DayAvailability {
                date,
                available: !runs_for(&day_slots, &service).is_empty(),
            }
        })
        .collect();

    Ok(WeekAvailability {
        week_offset: plan.offset,
        week_start: plan.start,
        week_end: plan.end,
        has_previous: plan.has_previous,
        has_next: plan.has_next,
        days,
    })
}

async fn load_service<C>(catalog: &C, service_id: Uuid) -> BookingResult<Service>
where
    C: SlotCatalog + ?Sized,
{
    let service = catalog
        .service(service_id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Service with ID {} not found", service_id)))?;

    slot_count(service.duration_minutes)?;
    Ok(service)
}

/// The chosen staff member if one was given, otherwise everyone offering
/// the service. A chosen staff member who does not offer it yields nobody.
async fn candidate_staff<C>(
    catalog: &C,
    service: &Service,
    staff_id: Option<Uuid>,
) -> BookingResult<Vec<Uuid>>
where
    C: SlotCatalog + ?Sized,
{
    match staff_id {
        Some(id) => {
            let staff = catalog
                .staff(id)
                .await?
                .ok_or_else(|| BookingError::NotFound(format!("Staff with ID {} not found", id)))?;
            if staff.offers(service.id) {
                Ok(vec![staff.id])
            } else {
                Ok(Vec::new())
            }
        }
        None => Ok(catalog.staff_offering(service.id).await?),
    }
}

async fn load_slots<C>(
    catalog: &C,
    staff_ids: &[Uuid],
    window: &DateWindow,
) -> BookingResult<Vec<TimeSlot>>
where
    C: SlotCatalog + ?Sized,
{
    let mut slots = catalog.free_slots(staff_ids, window.from, window.to).await?;
    slots.retain(|slot| window.contains(slot.start_time));
    slots.sort_by(|a, b| (a.staff_id, a.start_time).cmp(&(b.staff_id, b.start_time)));
    Ok(slots)
}

fn runs_for(slots: &[TimeSlot], service: &Service) -> Vec<TimeSlot> {
    // Durations were validated by `load_service`, so the cast is lossless.
    find_runs(slots, service.duration_minutes as u32)
}
