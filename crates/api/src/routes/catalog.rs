use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/services",
            post(handlers::catalog::create_service).get(handlers::catalog::list_services),
        )
        .route(
            "/api/services/:id",
            get(handlers::catalog::get_service).put(handlers::catalog::update_service),
        )
        .route(
            "/api/staff",
            post(handlers::catalog::create_staff).get(handlers::catalog::list_staff),
        )
        .route("/api/staff/:id", get(handlers::catalog::get_staff))
        .route(
            "/api/staff/:id/services",
            put(handlers::catalog::set_staff_services),
        )
}
