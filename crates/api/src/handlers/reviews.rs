use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use salonbook_core::models::review::{CreateReviewRequest, Review};
use salonbook_db::engine::reviews;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn create_review(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let review = reviews::create_review(&state.db_pool, &payload).await?;

    Ok((StatusCode::CREATED, Json(review)))
}

#[axum::debug_handler]
pub async fn delete_review(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    reviews::delete_review(&state.db_pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_reviews(
    State(state): State<Arc<ApiState>>,
    Path(staff_id): Path<Uuid>,
) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(reviews::list_reviews(&state.db_pool, staff_id).await?))
}
