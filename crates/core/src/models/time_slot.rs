use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Free,
    Booked,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Free => "free",
            SlotStatus::Booked => "booked",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(SlotStatus::Free),
            "booked" => Ok(SlotStatus::Booked),
            other => Err(format!("unknown slot status '{}'", other)),
        }
    }
}

/// One 15-minute unit of a staff member's calendar.
///
/// `start_time` is salon-local wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub start_time: NaiveDateTime,
    pub status: SlotStatus,
}

impl TimeSlot {
    pub fn is_free(&self) -> bool {
        self.status == SlotStatus::Free
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotResponse {
    pub id: Uuid,
    pub start_time: NaiveDateTime,
    pub status: SlotStatus,
}

impl From<TimeSlot> for TimeSlotResponse {
    fn from(slot: TimeSlot) -> Self {
        Self {
            id: slot.id,
            start_time: slot.start_time,
            status: slot.status,
        }
    }
}
