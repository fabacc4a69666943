use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(BookingStatus::Scheduled),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status '{}'", other)),
        }
    }
}

/// A reservation of one run of slots.
///
/// Only the anchor (first) slot is stored; the run length is recomputed from
/// the service duration whenever the run has to be released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub client_id: Uuid,
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub anchor_slot_id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub external_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveRequest {
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub start_time: NaiveDateTime,
    /// Chat-side identifier of the client; a client record is created on
    /// first booking.
    pub client_external_id: String,
}

/// Booking joined with the names and anchor time a collaborator needs to
/// render history. `start_time` is `None` once the anchor slot has been
/// regenerated away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDetails {
    pub id: Uuid,
    pub client_external_id: String,
    pub staff_id: Uuid,
    pub staff_name: String,
    pub service_id: Uuid,
    pub service_name: String,
    pub duration_minutes: i32,
    pub start_time: Option<NaiveDateTime>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingHistoryQuery {
    pub client_id: Option<String>,
    pub staff_id: Option<Uuid>,
}
