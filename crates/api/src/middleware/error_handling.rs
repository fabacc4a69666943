//! # Error Handling Middleware
//!
//! Converts [`BookingError`] into HTTP responses with a JSON body of the form
//! `{"error": "<message>"}`.
//!
//! | variant        | status |
//! |----------------|--------|
//! | `NotFound`     | 404    |
//! | `InvalidInput` | 400    |
//! | `SlotConflict` | 409    |
//! | `Database`     | 500    |
//! | `Internal`     | 500    |
//!
//! Server-side failures are logged in full and answered with a generic
//! message, so storage details never reach the chat front-end.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use salonbook_core::errors::BookingError;
use serde_json::json;
use tracing::error;

/// Handler error type; use `?` on any `BookingResult` inside a handler.
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            BookingError::SlotConflict(_) => StatusCode::CONFLICT,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if self.0.is_user_facing() {
            self.0.to_string()
        } else {
            error!("Request failed: {:?}", self.0);
            "Internal server error".to_string()
        };
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Maps a BookingError straight to its HTTP response.
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
