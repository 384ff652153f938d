//! Forge API /v1: REST endpoints
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/v1/health", get(handlers::health))
        .route("/v1/ingest/{kind}", post(handlers::ingest_kind))
        .route("/v1/validate", post(handlers::validate))
        .route("/v1/rules/catalog", get(handlers::rules_catalog))
        .route("/v1/rules/suggest", post(handlers::rules_suggest))
        .route("/v1/rules", post(handlers::rules_add))
        .route("/v1/rules/remove", post(handlers::rules_remove))
        .route("/v1/rules/export", post(handlers::rules_export))
        .route("/v1/export", post(handlers::export))
        .route("/metrics", get(handlers::metrics))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(state: AppState) -> std::io::Result<()> {
    let addr = state.config.addr();
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Forge API listening on {}", addr);
    axum::serve(listener, app).await
}
