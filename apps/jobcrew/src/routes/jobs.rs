//! Axum route handlers for the job search API.

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::artifacts;
use crate::errors::AppError;
use crate::state::AppState;
use crate::tasks::{JobCriteria, PipelineInputs};

#[derive(Debug, Default, Deserialize)]
pub struct SearchJobsRequest {
    pub role: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub keywords: Option<String>,
    /// Optional resume summary; a stand-in is derived from `experience` when absent.
    pub resume: Option<String>,
    #[serde(default)]
    pub track: bool,
}

impl SearchJobsRequest {
    fn into_inputs(self) -> PipelineInputs {
        let criteria = JobCriteria::new(
            self.role.as_deref(),
            self.location.as_deref(),
            self.experience.as_deref(),
            self.keywords.as_deref(),
        );
        PipelineInputs::new(criteria)
            .with_resume_summary(self.resume.as_deref())
            .with_tracking(self.track)
    }
}

#[derive(Debug, Serialize)]
pub struct SearchJobsResponse {
    pub success: bool,
    pub result: String,
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// POST /search-jobs
///
/// Runs the full pipeline on a spawned task. The handler holds a drop guard on
/// the run's cancellation token, so a client disconnect stops the run at the
/// next stage boundary.
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    payload: Result<Json<SearchJobsRequest>, JsonRejection>,
) -> Result<Json<SearchJobsResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let inputs = request.into_inputs();

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let service = Arc::clone(&state.service);
    let outcome = tokio::spawn(service.run(inputs, cancel))
        .await
        .map_err(|e| AppError::Internal(anyhow!("pipeline task failed: {e}")))??;

    Ok(Json(SearchJobsResponse {
        success: true,
        result: outcome.text,
        filename: outcome.filename,
        warning: outcome.warning,
    }))
}

/// GET /download/:filename
///
/// Streams a previously written report as an attachment.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = artifacts::read_report(state.service.results_dir(), &filename).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::pipeline::testing::ScriptedExecutor;
    use crate::pipeline::StageError;
    use crate::routes::build_router;
    use crate::service::tests::service_with;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(executor: Arc<ScriptedExecutor>, dir: &std::path::Path) -> axum::Router {
        build_router(AppState {
            config: Arc::new(test_config()),
            service: service_with(executor, dir.to_path_buf()),
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/search-jobs")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_request_defaults_fill_missing_fields() {
        let request: SearchJobsRequest =
            serde_json::from_str(r#"{"role": "", "keywords": "Rust"}"#).unwrap();
        let inputs = request.into_inputs();
        assert_eq!(inputs.criteria.role, "Software Developer");
        assert_eq!(inputs.criteria.location, "Remote");
        assert_eq!(inputs.criteria.keywords, "Rust");
        assert!(!inputs.include_tracking);
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(Arc::new(ScriptedExecutor::new()), dir.path())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(Arc::new(ScriptedExecutor::new()), dir.path())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/search-jobs"));
    }

    #[tokio::test]
    async fn test_search_jobs_success_then_download() {
        let dir = tempfile::tempdir().unwrap();
        let router = app(Arc::new(ScriptedExecutor::new()), dir.path());

        let response = router
            .clone()
            .oneshot(post_json(r#"{"role": "Rust Engineer", "location": "Berlin"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert!(body["result"].as_str().unwrap().contains("INTERVIEW PREPARATION"));
        assert!(body.get("warning").is_none());
        let filename = body["filename"].as_str().unwrap().to_string();

        let download = router
            .oneshot(
                Request::get(format!("/download/{filename}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(download.status(), StatusCode::OK);
        let disposition = download.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment"));
        let bytes = to_bytes(download.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(bytes.to_vec()).unwrap(),
            body["result"].as_str().unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_jobs_rate_limited_returns_429() {
        let dir = tempfile::tempdir().unwrap();
        let executor = Arc::new(ScriptedExecutor::new());
        executor.script(
            "research",
            (0..3)
                .map(|_| Err(StageError::RateLimited("429".to_string())))
                .collect(),
        );

        let response = app(executor, dir.path())
            .oneshot(post_json("{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_search_jobs_malformed_body_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(Arc::new(ScriptedExecutor::new()), dir.path())
            .oneshot(post_json("{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_download_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(Arc::new(ScriptedExecutor::new()), dir.path())
            .oneshot(
                Request::get("/download/..%2F..%2Fetc%2Fpasswd")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["success"], false);
    }
}
