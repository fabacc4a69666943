use axum::{routing::put, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/staff/:id/schedule",
        put(handlers::schedule::define_schedule).get(handlers::schedule::staff_schedule),
    )
}
