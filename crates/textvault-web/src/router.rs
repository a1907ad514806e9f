use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::template;

pub fn app(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/submit", post(handlers::submit::submit))
        .route("/records", get(handlers::records::list))
        .route("/records/{id}", get(handlers::records::detail))
        .route(
            "/api/records",
            get(handlers::api::list).post(handlers::api::create),
        )
        .route("/api/records/{id}", get(handlers::api::get))
        .route("/static/style.css", get(template::serve_style))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
