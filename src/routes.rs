use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{auth::auth_handler, listings::listings_handler},
    AppState,
};

pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth_handler())
        .nest("/realestates", listings_handler())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state))
}
