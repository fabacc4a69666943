//! # SalonBook API
//!
//! HTTP surface of the booking engine: availability queries for the chat
//! front-end, reservation and cancellation, and the admin endpoints for the
//! catalog, staff schedules and reviews.
//!
//! ## Architecture
//!
//! - **Routes**: endpoint paths, grouped by resource
//! - **Handlers**: extract the request, call the engine, shape the response
//! - **Middleware**: error-to-response mapping
//! - **Config**: environment configuration
//!
//! Handlers hold no state of their own; everything a request needs arrives
//! in its parameters or in the immutable [`ApiState`].

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{http::HeaderValue, Router};
use eyre::{Result, WrapErr};
use salonbook_core::calendar::BookingPolicy;
use salonbook_db::slot_catalog::PgSlotCatalog;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// PostgreSQL connection pool for transactional operations
    pub db_pool: PgPool,
    /// Read-only catalog view used by availability queries
    pub catalog: PgSlotCatalog,
    pub policy: BookingPolicy,
}

impl ApiState {
    pub fn new(db_pool: PgPool, policy: BookingPolicy) -> Self {
        Self {
            catalog: PgSlotCatalog::new(db_pool.clone()),
            db_pool,
            policy,
        }
    }
}

/// Builds the router with every endpoint attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Availability for the chat front-end
        .merge(routes::availability::routes())
        // Reservation, cancellation and history
        .merge(routes::bookings::routes())
        // Services and staff
        .merge(routes::catalog::routes())
        // Staff slot grids
        .merge(routes::schedule::routes())
        .merge(routes::reviews::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// Installs the global tracing subscriber, builds the router with CORS,
/// request tracing and timeout layers, and serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(db_pool, config.policy));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("Invalid API_CORS_ORIGINS value")?;
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins);

        app.layer(cors)
    } else {
        app
    };

    // Request spans and timeout
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        open_hour = config.policy.open_hour,
        close_hour = config.policy.close_hour,
        max_weeks_ahead = config.policy.max_weeks_ahead,
        "Server listening on http://{}",
        addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}
