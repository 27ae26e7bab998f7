pub mod handlers;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::context::AppContext;

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/gmail/send", post(handlers::gmail_send))
        .route("/agent/search", post(handlers::agent_search))
        .route("/api/upload", post(handlers::pdf_upload))
        .route("/api/search", post(handlers::pdf_search))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
