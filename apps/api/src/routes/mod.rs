pub mod health;
pub mod ui;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/settings", get(handlers::handle_settings))
        .route(
            "/api/v1/cover-letters",
            post(handlers::handle_generate_cover_letter),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::generation::generator::test_support::{FailingGenerator, FixedGenerator};
    use crate::generation::invoker::TextGenerator;
    use crate::state::ModelInfo;

    fn test_state(generator: Arc<dyn TextGenerator>) -> AppState {
        AppState {
            generator,
            config: Config {
                model_path: PathBuf::from("/models/fine_tuned_model"),
                port: 8080,
                rust_log: "info".to_string(),
                force_cpu: true,
                generation_seed: Some(1),
            },
            model_info: ModelInfo {
                device: "CPU".to_string(),
                model_path: "/models/fine_tuned_model".to_string(),
                architecture: "gpt2".to_string(),
            },
        }
    }

    fn application_json() -> Value {
        json!({
            "applicant_name": "Priya Verma",
            "address": "123 Main St, Springfield, IL 62704",
            "phone": "+1 234 567 8900",
            "email": "priya@example.com",
            "job_title": "Data Analyst",
            "company": "Google",
            "recruiter": "",
            "company_address": "1600 Amphitheatre Parkway, Mountain View, CA 94043",
            "experience": "Business Intelligence Intern working on SQL and Tableau",
            "skills": "Python, Excel, Power BI"
        })
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_path(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_generate_returns_three_letters_in_order() {
        let app = build_router(test_state(Arc::new(FixedGenerator::new(
            "\nI would love to bring my analytics skills to Google.",
        ))));
        let (status, body) = post_json(
            app,
            "/api/v1/cover-letters",
            json!({ "application": application_json(), "template_style": "Formal" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected_style"], "Formal");
        assert_eq!(
            body["letter_body"],
            "I would love to bring my analytics skills to Google."
        );
        let letters = body["letters"].as_array().unwrap();
        let styles: Vec<&str> = letters.iter().map(|l| l["style"].as_str().unwrap()).collect();
        assert_eq!(styles, vec!["Minimal", "Formal", "Modern"]);
        assert_eq!(letters[1]["title"], "Formal Template");
        assert!(letters[1]["text"].as_str().unwrap().contains("Springfield, IL 62704"));
        assert!(letters[2]["text"].as_str().unwrap().contains("Dear Hiring Manager,"));
    }

    #[tokio::test]
    async fn test_template_style_defaults_to_minimal() {
        let app = build_router(test_state(Arc::new(FixedGenerator::new("Body"))));
        let (status, body) = post_json(
            app,
            "/api/v1/cover-letters",
            json!({ "application": application_json() }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected_style"], "Minimal");
        assert_eq!(body["letters"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_field_is_rejected() {
        let mut application = application_json();
        application.as_object_mut().unwrap().remove("skills");
        let app = build_router(test_state(Arc::new(FixedGenerator::new("Body"))));
        let (status, body) = post_json(
            app,
            "/api/v1/cover-letters",
            json!({ "application": application }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_generation_failure_returns_500() {
        let app = build_router(test_state(Arc::new(FailingGenerator)));
        let (status, body) = post_json(
            app,
            "/api/v1/cover-letters",
            json!({ "application": application_json() }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "GENERATION_ERROR");
    }

    #[tokio::test]
    async fn test_settings_reports_device_and_styles() {
        let app = build_router(test_state(Arc::new(FixedGenerator::new("Body"))));
        let (status, bytes) = get_path(app, "/api/v1/settings").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["device"], "CPU");
        assert_eq!(body["model_path"], "/models/fine_tuned_model");
        assert_eq!(body["template_styles"], json!(["Minimal", "Formal", "Modern"]));
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let app = build_router(test_state(Arc::new(FixedGenerator::new("Body"))));
        let (status, bytes) = get_path(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("cover-letter-form"));
        assert!(html.contains("/api/v1/cover-letters"));
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(Arc::new(FixedGenerator::new("Body"))));
        let (status, bytes) = get_path(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
