use chrono::{DateTime, NaiveDateTime, Utc};
use eyre::{eyre, Report};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use salonbook_core::models::{
    booking::{Booking, BookingDetails, Client},
    review::Review,
    service::Service,
    staff::Staff,
    time_slot::TimeSlot,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub name: String,
    pub cost: i32,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStaff {
    pub id: Uuid,
    pub name: String,
    pub total_rating: i64,
    pub num_reviews: i64,
    pub service_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub start_time: NaiveDateTime,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClient {
    pub id: Uuid,
    pub external_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub client_id: Uuid,
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub anchor_slot_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookingDetails {
    pub id: Uuid,
    pub client_external_id: String,
    pub staff_id: Uuid,
    pub staff_name: String,
    pub service_id: Uuid,
    pub service_name: String,
    pub duration_minutes: i32,
    pub start_time: Option<NaiveDateTime>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReview {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub client_id: Uuid,
    pub staff_id: Uuid,
    pub rating: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Self {
            id: row.id,
            name: row.name,
            cost: row.cost,
            duration_minutes: row.duration_minutes,
        }
    }
}

impl From<DbStaff> for Staff {
    fn from(row: DbStaff) -> Self {
        Self {
            id: row.id,
            name: row.name,
            total_rating: row.total_rating,
            num_reviews: row.num_reviews,
            service_ids: row.service_ids,
        }
    }
}

impl From<DbClient> for Client {
    fn from(row: DbClient) -> Self {
        Self {
            id: row.id,
            external_id: row.external_id,
            created_at: row.created_at,
        }
    }
}

impl From<DbReview> for Review {
    fn from(row: DbReview) -> Self {
        Self {
            id: row.id,
            booking_id: row.booking_id,
            client_id: row.client_id,
            staff_id: row.staff_id,
            rating: row.rating,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

impl TryFrom<DbTimeSlot> for TimeSlot {
    type Error = Report;

    fn try_from(row: DbTimeSlot) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            staff_id: row.staff_id,
            start_time: row.start_time,
            status: row.status.parse().map_err(|e| eyre!("time slot {}: {}", row.id, e))?,
        })
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = Report;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            client_id: row.client_id,
            staff_id: row.staff_id,
            service_id: row.service_id,
            anchor_slot_id: row.anchor_slot_id,
            status: row.status.parse().map_err(|e| eyre!("booking {}: {}", row.id, e))?,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbBookingDetails> for BookingDetails {
    type Error = Report;

    fn try_from(row: DbBookingDetails) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            client_external_id: row.client_external_id,
            staff_id: row.staff_id,
            staff_name: row.staff_name,
            service_id: row.service_id,
            service_name: row.service_name,
            duration_minutes: row.duration_minutes,
            start_time: row.start_time,
            status: row.status.parse().map_err(|e| eyre!("booking {}: {}", row.id, e))?,
            created_at: row.created_at,
        })
    }
}

/// Converts a batch of rows, failing on the first malformed one.
pub fn convert_all<R, T>(rows: Vec<R>) -> eyre::Result<Vec<T>>
where
    T: TryFrom<R, Error = Report>,
{
    rows.into_iter().map(T::try_from).collect()
}
