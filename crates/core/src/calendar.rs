//! Calendar arithmetic for the slot grid: granularity, booking horizon,
//! query windows and the expansion of a day's working hours into slots.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};
use crate::models::schedule::DaySchedule;
use crate::models::time_slot::SlotStatus;

/// Length of one slot in minutes.
pub const SLOT_MINUTES: i64 = 15;

pub const SLOTS_PER_HOUR: i64 = 60 / SLOT_MINUTES;

pub fn slot_step() -> Duration {
    Duration::minutes(SLOT_MINUTES)
}

/// Number of slots a service of `duration_minutes` occupies.
///
/// Durations must be positive multiples of [`SLOT_MINUTES`]; anything else
/// would either under-reserve or never be bookable.
pub fn slot_count(duration_minutes: i32) -> BookingResult<usize> {
    let minutes = i64::from(duration_minutes);
    if minutes <= 0 {
        return Err(BookingError::InvalidInput(format!(
            "Service duration must be positive, got {} minutes",
            duration_minutes
        )));
    }
    if minutes % SLOT_MINUTES != 0 {
        return Err(BookingError::InvalidInput(format!(
            "Service duration must be a multiple of {} minutes, got {}",
            SLOT_MINUTES, duration_minutes
        )));
    }
    Ok((minutes / SLOT_MINUTES) as usize)
}

/// Whether `time` sits exactly on the slot grid.
pub fn is_on_grid(time: NaiveDateTime) -> bool {
    time.second() == 0 && time.nanosecond() == 0 && i64::from(time.minute()) % SLOT_MINUTES == 0
}

/// Salon-wide booking rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPolicy {
    /// First bookable hour of the business day.
    pub open_hour: u32,
    /// Hour the business day ends (exclusive).
    pub close_hour: u32,
    /// Weeks after the current one that clients may book into.
    pub max_weeks_ahead: i64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            open_hour: 9,
            close_hour: 19,
            max_weeks_ahead: 3,
        }
    }
}

impl BookingPolicy {
    pub fn validate(&self) -> BookingResult<()> {
        if self.open_hour >= self.close_hour || self.close_hour > 24 {
            return Err(BookingError::InvalidInput(format!(
                "Business hours {}..{} are not a valid range",
                self.open_hour, self.close_hour
            )));
        }
        if self.max_weeks_ahead < 0 {
            return Err(BookingError::InvalidInput(
                "max_weeks_ahead cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// First day that is no longer bookable.
    pub fn horizon_end(&self, today: NaiveDate) -> NaiveDate {
        week_start(today) + Duration::weeks(self.max_weeks_ahead + 1)
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Half-open `[from, to)` range of slot start times to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateWindow {
    /// Window covering a single bookable day. Slots of `date` that start
    /// before `now` are excluded.
    pub fn day(date: NaiveDate, now: NaiveDateTime, policy: &BookingPolicy) -> BookingResult<Self> {
        let today = now.date();
        if date < today {
            return Err(BookingError::InvalidInput(format!(
                "Date {} is in the past",
                date
            )));
        }
        let horizon = policy.horizon_end(today);
        if date >= horizon {
            return Err(BookingError::InvalidInput(format!(
                "Date {} is beyond the booking horizon (last bookable day is {})",
                date,
                horizon - Duration::days(1)
            )));
        }

        Ok(Self {
            from: start_of_day(date).max(now),
            to: start_of_day(date + Duration::days(1)),
        })
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.from <= time && time < self.to
    }
}

/// One Monday-to-Sunday page of the date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekPlan {
    pub offset: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub has_previous: bool,
    pub has_next: bool,
    pub window: DateWindow,
}

impl WeekPlan {
    /// Resolves the week `offset` weeks after the current one. The offset is
    /// clamped into `0..=max_weeks_ahead`.
    pub fn resolve(offset: i64, now: NaiveDateTime, policy: &BookingPolicy) -> Self {
        let offset = offset.clamp(0, policy.max_weeks_ahead);
        let start = week_start(now.date()) + Duration::weeks(offset);
        let end = start + Duration::days(6);

        Self {
            offset,
            start,
            end,
            has_previous: offset > 0,
            has_next: offset < policy.max_weeks_ahead,
            window: DateWindow {
                from: start_of_day(start).max(now),
                to: start_of_day(end + Duration::days(1)),
            },
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..7).map(move |i| self.start + Duration::days(i))
    }
}

/// Expands one day of working hours into the full, gapless slot grid of the
/// business day.
pub fn expand_day(
    day: &DaySchedule,
    policy: &BookingPolicy,
) -> BookingResult<Vec<(NaiveDateTime, SlotStatus)>> {
    let mut working = HashSet::new();
    for &hour in &day.working_hours {
        if hour < policy.open_hour || hour >= policy.close_hour {
            return Err(BookingError::InvalidInput(format!(
                "Working hour {} on {} is outside business hours {}..{}",
                hour, day.date, policy.open_hour, policy.close_hour
            )));
        }
        working.insert(hour);
    }

    let mut slots = Vec::new();
    for hour in policy.open_hour..policy.close_hour {
        let status = if working.contains(&hour) {
            SlotStatus::Free
        } else {
            SlotStatus::Booked
        };
        let hour_start = start_of_day(day.date) + Duration::hours(i64::from(hour));
        for i in 0..SLOTS_PER_HOUR {
            slots.push((hour_start + Duration::minutes(SLOT_MINUTES * i), status));
        }
    }

    Ok(slots)
}

/// Rejects schedule requests that name the same date twice.
pub fn ensure_distinct_days(days: &[DaySchedule]) -> BookingResult<()> {
    let mut seen = HashSet::new();
    for day in days {
        if !seen.insert(day.date) {
            return Err(BookingError::InvalidInput(format!(
                "Date {} appears more than once",
                day.date
            )));
        }
    }
    Ok(())
}
