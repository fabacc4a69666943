use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/bookings",
            post(handlers::bookings::reserve).get(handlers::bookings::list_bookings),
        )
        .route(
            "/api/bookings/:id/cancel",
            post(handlers::bookings::cancel_booking),
        )
        .route(
            "/api/bookings/:id/complete",
            post(handlers::bookings::complete_booking),
        )
}
