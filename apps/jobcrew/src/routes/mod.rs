pub mod health;
pub mod jobs;

use axum::{
    response::Html,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health::health_handler))
        .route("/search-jobs", post(jobs::handle_search_jobs))
        .route("/download/:filename", get(jobs::handle_download))
        .with_state(state)
}
