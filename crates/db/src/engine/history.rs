use salonbook_core::{errors::BookingResult, models::booking::BookingDetails};
use uuid::Uuid;

use crate::models::convert_all;
use crate::repositories::booking;
use crate::DbPool;

/// Bookings of one client, newest first. An unknown client simply has none.
pub async fn bookings_for_client(pool: &DbPool, external_id: &str) -> BookingResult<Vec<BookingDetails>> {
    let rows = booking::list_bookings_for_client(pool, external_id).await?;
    Ok(convert_all(rows)?)
}

/// Bookings served by one staff member, newest first.
pub async fn bookings_for_staff(pool: &DbPool, staff_id: Uuid) -> BookingResult<Vec<BookingDetails>> {
    let rows = booking::list_bookings_for_staff(pool, staff_id).await?;
    Ok(convert_all(rows)?)
}
