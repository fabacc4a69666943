use axum::{
    extract::{Query, State},
    Json,
};
use salonbook_core::{
    availability,
    models::availability::{
        AvailableStart, DayAvailabilityQuery, WeekAvailability, WeekAvailabilityQuery,
    },
};
use std::sync::Arc;

use super::salon_now;
use crate::{middleware::error_handling::AppError, ApiState};

/// Bookable start times for one day.
#[axum::debug_handler]
pub async fn day_availability(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DayAvailabilityQuery>,
) -> Result<Json<Vec<AvailableStart>>, AppError> {
    let starts = availability::available_starts_on(
        &state.catalog,
        query.service_id,
        query.staff_id,
        query.date,
        salon_now(),
        &state.policy,
    )
    .await?;

    Ok(Json(starts))
}

/// Which days of a week have at least one bookable start.
#[axum::debug_handler]
pub async fn week_availability(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<WeekAvailabilityQuery>,
) -> Result<Json<WeekAvailability>, AppError> {
    let week = availability::week_availability(
        &state.catalog,
        query.service_id,
        query.staff_id,
        query.week_offset,
        salon_now(),
        &state.policy,
    )
    .await?;

    Ok(Json(week))
}
