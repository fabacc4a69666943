pub mod availability;
pub mod bookings;
pub mod catalog;
pub mod reviews;
pub mod schedule;

use chrono::NaiveDateTime;

/// Current salon-local wall-clock time.
pub(crate) fn salon_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
