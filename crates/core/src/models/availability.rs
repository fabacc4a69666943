use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable start: the first slot of a free run long enough for the
/// requested service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableStart {
    pub start_time: NaiveDateTime,
    pub staff_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailabilityQuery {
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekAvailabilityQuery {
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    #[serde(default)]
    pub week_offset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekAvailability {
    pub week_offset: i64,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub has_previous: bool,
    pub has_next: bool,
    pub days: Vec<DayAvailability>,
}
