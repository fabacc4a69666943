use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of a staff member's working pattern.
///
/// Each listed hour opens four free 15-minute slots; every other hour of the
/// business day is written as blocked. An empty list marks a day off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    #[serde(default)]
    pub working_hours: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefineScheduleRequest {
    pub days: Vec<DaySchedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefineScheduleResponse {
    pub days: usize,
    pub slots_written: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}
