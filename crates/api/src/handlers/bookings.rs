use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use salonbook_core::{
    errors::BookingError,
    models::booking::{Booking, BookingDetails, BookingHistoryQuery, ReserveRequest},
};
use salonbook_db::engine::{history, reservation};
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn reserve(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = reservation::reserve(&state.db_pool, &payload).await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Booking history of either a client or a staff member.
#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<BookingHistoryQuery>,
) -> Result<Json<Vec<BookingDetails>>, AppError> {
    let bookings = match (query.client_id.as_deref(), query.staff_id) {
        (Some(client_id), None) => history::bookings_for_client(&state.db_pool, client_id).await?,
        (None, Some(staff_id)) => history::bookings_for_staff(&state.db_pool, staff_id).await?,
        _ => {
            return Err(AppError(BookingError::InvalidInput(
                "Exactly one of client_id or staff_id must be given".to_string(),
            )));
        }
    };

    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    reservation::cancel(&state.db_pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn complete_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = reservation::complete(&state.db_pool, id).await?;

    Ok(Json(booking))
}
