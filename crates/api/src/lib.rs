//! # ClassRota API
//!
//! HTTP surface of the tutoring rota: time slot templates, tutor assignments,
//! and on-demand session materialization and preview.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Validate requests and call the engine and repositories
//! - **Middleware**: Error mapping shared by every handler
//! - **Config**: Environment configuration and the weeks-ahead horizon

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::{Router, http::HeaderValue};
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::{ApiConfig, Horizon};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    pub horizon: Horizon,
}

/// Builds the router with every route attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Time slot templates
        .merge(routes::time_slots::routes())
        // Tutor invitations and responses
        .merge(routes::assignments::routes())
        // Materialization and preview
        .merge(routes::sessions::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// Logging is expected to be initialized by the caller.
///
/// # Example
///
/// ```rust,ignore
/// let config = config::ApiConfig::from_env()?;
/// let db_pool = classrota_db::create_pool(&config.database_url).await?;
/// start_server(config, db_pool).await?;
/// ```
pub async fn start_server(config: ApiConfig, db_pool: PgPool) -> Result<()> {
    let state = Arc::new(ApiState {
        db_pool,
        horizon: config.horizon,
    });
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin {}", origin);
                    None
                }
            })
            .collect();

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(allowed);

        app.layer(cors)
    } else {
        app
    };

    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .layer(tower_http::timeout::TimeoutLayer::new(
                std::time::Duration::from_secs(config.request_timeout),
            )),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
