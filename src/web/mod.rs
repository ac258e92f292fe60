use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::app::AppContext;

pub mod handlers;
pub mod models;

pub fn create_router(ctx: Arc<AppContext>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let assets = ServeDir::new(&ctx.config.assets_dir);
    // documents routinely exceed axum's 2 MB default
    let upload_limit = DefaultBodyLimit::max(ctx.config.max_upload_bytes);

    Router::new()
        // Form submissions
        .route("/actions/search", post(handlers::submit_search))
        .route("/actions/keywords/generate", post(handlers::generate_keywords))
        .route("/actions/keywords/expand", post(handlers::expand_keyword))
        .route(
            "/actions/analyze",
            post(handlers::analyze_document).layer(upload_limit),
        )
        // Static assets
        .nest_service("/assets", assets)
        // Every other GET goes through the page route table
        .fallback(get(handlers::page))
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
