use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/reviews", post(handlers::reviews::create_review))
        .route("/api/reviews/:id", delete(handlers::reviews::delete_review))
        .route("/api/staff/:id/reviews", get(handlers::reviews::list_reviews))
}
