//! Axum router configuration with middleware.
//!
//! Static assets are served from the configured directory under `/static`
//! when it exists; otherwise only the portal routes are mounted.

use std::path::Path;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::PortalState;

/// Build the portal router.
pub fn build_router(
    state: PortalState,
    static_dir: Option<&Path>,
    max_upload_bytes: usize,
) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::form::show_form))
        .route("/submit", post(handlers::action::submit))
        .route("/cancel", post(handlers::action::cancel))
        .route(
            "/upload",
            post(handlers::upload::upload_files).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/upload/reset",
            post(handlers::upload::reset_upload_without_label),
        )
        .route(
            "/upload/reset/{label}",
            post(handlers::upload::reset_upload),
        )
        .route("/health", get(health_check));

    if let Some(dir) = static_dir {
        if dir.is_dir() {
            router = router.nest_service("/static", ServeDir::new(dir));
            tracing::info!(path = %dir.display(), "Static file serving enabled");
        } else {
            tracing::warn!(path = %dir.display(), "Static directory not found, skipping");
        }
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// GET /health
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
