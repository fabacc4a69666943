use axum::{
    extract::{Path, Query, State},
    Json,
};
use salonbook_core::models::{
    schedule::{DefineScheduleRequest, DefineScheduleResponse, ScheduleRangeQuery},
    time_slot::TimeSlotResponse,
};
use salonbook_db::engine::schedule;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Regenerates the listed days of a staff member's slot grid.
#[axum::debug_handler]
pub async fn define_schedule(
    State(state): State<Arc<ApiState>>,
    Path(staff_id): Path<Uuid>,
    Json(payload): Json<DefineScheduleRequest>,
) -> Result<Json<DefineScheduleResponse>, AppError> {
    let written = schedule::define_schedule(&state.db_pool, staff_id, &payload.days, &state.policy).await?;

    Ok(Json(written))
}

#[axum::debug_handler]
pub async fn staff_schedule(
    State(state): State<Arc<ApiState>>,
    Path(staff_id): Path<Uuid>,
    Query(range): Query<ScheduleRangeQuery>,
) -> Result<Json<Vec<TimeSlotResponse>>, AppError> {
    let slots = schedule::staff_schedule(&state.db_pool, staff_id, range.from, range.to).await?;

    Ok(Json(slots.into_iter().map(TimeSlotResponse::from).collect()))
}
