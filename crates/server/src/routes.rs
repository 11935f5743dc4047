pub mod products;
pub mod recipes;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::{AppState, UiSettings};

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn ui_settings(State(state): State<AppState>) -> Json<UiSettings> {
    Json(state.ui)
}

/// Build the full application router: JSON API plus the static frontend fallback
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let index = format!("{}/index.html", state.frontend_dir);
    let static_dir = ServeDir::new(&state.frontend_dir).fallback(ServeFile::new(index));

    let api = Router::new()
        .route(
            "/api/products",
            get(products::list_products)
                .post(products::submit_product)
                .layer(DefaultBodyLimit::max(state.upload_limit)),
        )
        .route("/api/products/edit", delete(products::cancel_edit))
        .route("/api/products/live", get(products::live_result).post(products::live_input))
        .route("/api/products/:index", delete(products::delete_product))
        .route("/api/products/:index/edit", post(products::begin_edit))
        .route("/api/recipes", get(recipes::search_recipes))
        .route("/api/ui", get(ui_settings));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
