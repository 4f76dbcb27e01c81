//! Route configuration and setup.

use axum::{
    extract::State,
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use vistoria_core::Config;

use crate::handlers::submit::submit_inspection;
use crate::state::AppState;

/// Signatures and evidence photos travel inline in the JSON body.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Submissions are heavyweight (inline images, outbound uploads); cap
/// in-flight requests rather than queueing unboundedly.
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/inspections", post(submit_inspection))
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    // validate() already rejected wildcard origins in production.
    let cors = if config.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("invalid CORS origin '{}': {}", origin, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([http::header::CONTENT_TYPE])
    };

    Ok(cors)
}

/// Liveness probe plus a summary of which optional collaborators are
/// configured. No outbound calls are made; this only reflects startup state.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    fn configured(present: bool) -> &'static str {
        if present {
            "configured"
        } else {
            "not_configured"
        }
    }

    Json(serde_json::json!({
        "status": "ok",
        "sheets": configured(state.sheets.is_some()),
        "storage": configured(state.storage.is_some()),
        "mail": configured(state.notifier.is_some()),
    }))
}
