use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/availability", get(handlers::availability::day_availability))
        .route(
            "/api/availability/week",
            get(handlers::availability::week_availability),
        )
}
