//! Reviews of completed bookings and the staff rating counters they feed.

use eyre::WrapErr;
use salonbook_core::{
    errors::{BookingError, BookingResult},
    models::{
        booking::{Booking, BookingStatus},
        review::{CreateReviewRequest, Review, MAX_RATING, MIN_RATING},
    },
};
use tracing::info;
use uuid::Uuid;

use crate::repositories::{booking, client, review, staff};
use crate::DbPool;

/// Records a review and adds it to the staff member's rating in the same
/// transaction.
///
/// # Errors
///
/// * `InvalidInput` - rating outside 1..=5, booking owned by another client,
///   booking not completed, or booking already reviewed
/// * `NotFound` - unknown booking
pub async fn create_review(pool: &DbPool, request: &CreateReviewRequest) -> BookingResult<Review> {
    if !(MIN_RATING..=MAX_RATING).contains(&request.rating) {
        return Err(BookingError::InvalidInput(format!(
            "Rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, request.rating
        )));
    }

    let mut tx = pool
        .begin()
        .await
        .wrap_err("Failed to start review transaction")?;

    let reviewed = Booking::try_from(
        booking::lock_booking(&mut *tx, request.booking_id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Booking with ID {} not found", request.booking_id))
            })?,
    )?;

    let owner = client::get_client_by_external_id(&mut *tx, request.client_external_id.trim()).await?;
    if owner.map(|c| c.id) != Some(reviewed.client_id) {
        return Err(BookingError::InvalidInput(format!(
            "Booking {} does not belong to this client",
            reviewed.id
        )));
    }
    if reviewed.status != BookingStatus::Completed {
        return Err(BookingError::InvalidInput(format!(
            "Only completed bookings can be reviewed; booking {} is {}",
            reviewed.id, reviewed.status
        )));
    }
    if review::get_review_by_booking_id(&mut *tx, reviewed.id).await?.is_some() {
        return Err(BookingError::InvalidInput(format!(
            "Booking {} has already been reviewed",
            reviewed.id
        )));
    }

    let created = review::create_review(
        &mut *tx,
        reviewed.id,
        reviewed.client_id,
        reviewed.staff_id,
        request.rating,
        request.text.trim(),
    )
    .await?;
    staff::adjust_rating(&mut *tx, reviewed.staff_id, i64::from(request.rating), 1).await?;

    tx.commit()
        .await
        .wrap_err("Failed to commit review")?;

    info!(review_id = %created.id, staff_id = %created.staff_id, rating = created.rating, "Review created");
    Ok(created.into())
}

/// Deletes a review and withdraws it from the staff member's rating.
pub async fn delete_review(pool: &DbPool, id: Uuid) -> BookingResult<()> {
    let mut tx = pool
        .begin()
        .await
        .wrap_err("Failed to start review deletion transaction")?;

    let removed = review::delete_review(&mut *tx, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Review with ID {} not found", id)))?;
    staff::adjust_rating(&mut *tx, removed.staff_id, -i64::from(removed.rating), -1).await?;

    tx.commit()
        .await
        .wrap_err("Failed to commit review deletion")?;

    info!(review_id = %id, staff_id = %removed.staff_id, "Review deleted");
    Ok(())
}

pub async fn list_reviews(pool: &DbPool, staff_id: Uuid) -> BookingResult<Vec<Review>> {
    if staff::get_staff_by_id(pool, staff_id).await?.is_none() {
        return Err(BookingError::NotFound(format!("Staff with ID {} not found", staff_id)));
    }
    let rows = review::list_reviews_for_staff(pool, staff_id).await?;
    Ok(rows.into_iter().map(Review::from).collect())
}
