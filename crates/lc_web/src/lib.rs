use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/scrape-blog", post(handlers::scrape_blog))
        .route(
            "/api/generate-line-content",
            post(handlers::generate_line_content),
        )
        .layer(cors)
        .with_state(Arc::new(state))
}
