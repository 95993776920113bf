//! HTTP Server for the nest API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | PUT    | `/transformation` | Nest flat records (Basic auth)       |

use axum::{
    extract::rejection::JsonRejection,
    http::{header, Method},
    response::Json,
    routing::{get, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::auth::Authenticated;
use super::types::{ApiError, TransformationRequest};
use crate::config::{Credentials, ServerConfig};
use crate::error::ServerResult;
use crate::models::{Nested, MAX_SERIALIZE_DEPTH};
use crate::transform::{transform, Strategy};

/// Shared, read-only server state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub credentials: Arc<Credentials>,
}

impl AppState {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/transformation", put(put_transformation))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    let app = router(AppState::new(config.credentials));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "nest server listening");
    tracing::info!("PUT /transformation - Nest flat records");
    tracing::info!("GET /health         - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("nest server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "nest",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Transform flat dicts into nested dicts.
async fn put_transformation(
    user: Authenticated,
    payload: Result<Json<TransformationRequest>, JsonRejection>,
) -> Result<Json<Nested>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        ApiError::from(rejection)
    })?;

    let strategy = Strategy::select(request.use_recursive_realization);
    tracing::info!(
        user = %user.username,
        ?strategy,
        records = request.flat_dicts.len(),
        levels = ?request.nesting_levels,
        "transformation requested"
    );

    let nested = transform(strategy, request.nesting_levels, request.flat_dicts)
        .and_then(|nested| nested.check_depth(MAX_SERIALIZE_DEPTH).map(|()| nested))
        .map_err(|e| {
            tracing::warn!(error = %e, "transformation failed");
            ApiError::from(e)
        })?;

    tracing::debug!(
        depth = nested.depth(),
        records = nested.record_count(),
        "transformation done"
    );
    Ok(Json(nested))
}
