pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ingest::handlers as ingest;
use crate::matching::handlers as matching;
use crate::review::handlers as review;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume parsing and scoring
        .route("/api/v1/resumes/parse", post(ingest::handle_parse_resume))
        .route("/api/v1/resumes/upload", post(ingest::handle_upload_resume))
        .route("/api/v1/resumes/score", post(scoring::handle_score_resume))
        // Job descriptions and keywords
        .route("/api/v1/jobs/parse", post(matching::handle_parse_job))
        .route("/api/v1/synonyms/:term", get(matching::handle_synonyms))
        // Import review
        .route("/api/v1/imports", post(review::handle_create_import))
        .route(
            "/api/v1/imports/:id",
            get(review::handle_get_import).delete(review::handle_discard_import),
        )
        .route(
            "/api/v1/imports/:id/actions",
            post(review::handle_apply_action),
        )
        .route("/api/v1/imports/:id/undo", post(review::handle_undo))
        .route("/api/v1/imports/:id/redo", post(review::handle_redo))
        .route(
            "/api/v1/imports/:id/commit",
            post(review::handle_commit_import),
        )
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::errors::AppError;
    use crate::ingest::extract::{TextExtractor, UploadedDocument};

    const BOUNDARY: &str = "resume-api-test-boundary";

    fn app() -> Router {
        build_router(AppState::new(Config::default()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn multipart(file_name: &str, content_type: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/resumes/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-api");
    }

    #[tokio::test]
    async fn test_parse_resume_endpoint() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/resumes/parse",
            Some(json!({"text": "John Doe\njohn@example.com\n555-123-4567"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["contact"]["first_name"], "John");
        assert_eq!(body["data"]["contact"]["phone"], "555-123-4567");
        assert!(body["data"].get("experience").is_none());
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/resumes/parse",
            Some(json!({"text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_score_endpoint_without_job_description() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/resumes/score",
            Some(json!({"resume": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 20);
        assert_eq!(body["breakdown"]["keyword_match"]["max_score"], 40);
        assert_eq!(body["breakdown"]["section_completeness"]["score"], 0);
    }

    #[tokio::test]
    async fn test_job_parse_and_synonyms() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/jobs/parse",
            Some(json!({"text": "5+ years of software engineering experience."})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["extracted_requirements"]["years_of_experience"], 5);

        let (status, body) = send(&app, Method::GET, "/api/v1/synonyms/K8s", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["canonical"], "kubernetes");
        assert!(body["group"].as_array().unwrap().contains(&json!("k8s")));
    }

    #[tokio::test]
    async fn test_import_review_lifecycle() {
        let app = app();
        let (status, view) = send(
            &app,
            Method::POST,
            "/api/v1/imports",
            Some(json!({"text": "Jane Smith\njane@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(view["confidence"]["contact"], "complete");
        assert_eq!(view["can_undo"], false);
        let id = view["session_id"].as_str().unwrap().to_string();

        let (status, view) = send(
            &app,
            Method::POST,
            &format!("/api/v1/imports/{id}/actions"),
            Some(json!({"action": "set_summary", "text": "Platform engineer."})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["snapshot"]["resume"]["summary"]["text"], "Platform engineer.");
        assert_eq!(view["can_undo"], true);

        let (_, view) = send(&app, Method::POST, &format!("/api/v1/imports/{id}/undo"), None).await;
        assert_eq!(view["snapshot"]["resume"]["summary"]["text"], "");
        assert_eq!(view["can_redo"], true);

        let (_, view) = send(&app, Method::POST, &format!("/api/v1/imports/{id}/redo"), None).await;
        assert_eq!(view["snapshot"]["resume"]["summary"]["text"], "Platform engineer.");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/imports/{id}/commit"),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume"]["contact"]["email"], "jane@example.com");
        assert_eq!(body["resume"]["summary"]["text"], "Platform engineer.");

        let (status, body) = send(&app, Method::GET, &format!("/api/v1/imports/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_discard_import() {
        let app = app();
        let (_, view) = send(
            &app,
            Method::POST,
            "/api/v1/imports",
            Some(json!({"text": "Jane Smith"})),
        )
        .await;
        let uri = format!("/api/v1/imports/{}", view["session_id"].as_str().unwrap());
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_plain_text() {
        let response = app()
            .oneshot(multipart("cv.txt", "text/plain", "John Doe\njohn@example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"]["contact"]["email"], "john@example.com");
    }

    #[tokio::test]
    async fn test_upload_unsupported_type() {
        let response = app()
            .oneshot(multipart("cv.docx", "application/octet-stream", "PK"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    struct CannedExtractor;

    #[async_trait]
    impl TextExtractor for CannedExtractor {
        async fn extract(&self, _document: UploadedDocument) -> Result<String, AppError> {
            Ok("Ada Lovelace\nada@example.com".to_string())
        }
    }

    #[tokio::test]
    async fn test_upload_uses_configured_extractor() {
        let mut state = AppState::new(Config::default());
        state.extractor = Arc::new(CannedExtractor);
        let response = build_router(state)
            .oneshot(multipart("cv.pdf", "application/pdf", "%PDF-1.7"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"]["contact"]["first_name"], "Ada");
    }
}
