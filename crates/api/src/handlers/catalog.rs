use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use salonbook_core::models::{
    service::{CreateServiceRequest, Service, UpdateServiceRequest},
    staff::{CreateStaffRequest, SetStaffServicesRequest, StaffResponse},
};
use salonbook_db::engine::catalog;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct StaffListQuery {
    pub service_id: Option<Uuid>,
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    let service = catalog::create_service(&state.db_pool, &payload).await?;

    Ok((StatusCode::CREATED, Json(service)))
}

#[axum::debug_handler]
pub async fn list_services(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<Service>>, AppError> {
    Ok(Json(catalog::list_services(&state.db_pool).await?))
}

#[axum::debug_handler]
pub async fn get_service(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, AppError> {
    Ok(Json(catalog::get_service(&state.db_pool, id).await?))
}

#[axum::debug_handler]
pub async fn update_service(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<Json<Service>, AppError> {
    let service = catalog::update_service(&state.db_pool, id, &payload).await?;

    Ok(Json(service))
}

#[axum::debug_handler]
pub async fn create_staff(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<StaffResponse>), AppError> {
    let staff = catalog::create_staff(&state.db_pool, &payload).await?;

    Ok((StatusCode::CREATED, Json(staff.into())))
}

/// All staff, or only those offering `service_id` when it is given.
#[axum::debug_handler]
pub async fn list_staff(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<StaffListQuery>,
) -> Result<Json<Vec<StaffResponse>>, AppError> {
    let staff = catalog::list_staff(&state.db_pool, query.service_id).await?;

    Ok(Json(staff.into_iter().map(StaffResponse::from).collect()))
}

#[axum::debug_handler]
pub async fn get_staff(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<StaffResponse>, AppError> {
    let staff = catalog::get_staff(&state.db_pool, id).await?;

    Ok(Json(staff.into()))
}

#[axum::debug_handler]
pub async fn set_staff_services(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetStaffServicesRequest>,
) -> Result<Json<StaffResponse>, AppError> {
    let staff = catalog::set_staff_services(&state.db_pool, id, &payload.service_ids).await?;

    Ok(Json(staff.into()))
}
