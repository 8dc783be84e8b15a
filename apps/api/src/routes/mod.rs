pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resumes/generate", post(handlers::handle_generate))
        .route("/api/v1/resumes/validate", post(handlers::handle_validate))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::{CompletionTransport, LlmError, ModelParameters};

    /// Always answers with the same text; counts calls.
    struct FixedTransport {
        credential: bool,
        reply: String,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl CompletionTransport for FixedTransport {
        fn has_credential(&self) -> bool {
            self.credential
        }

        async fn complete(
            &self,
            _system: &str,
            _prompt: &str,
            _params: &ModelParameters,
        ) -> Result<String, LlmError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.reply.clone())
        }
    }

    fn config() -> Config {
        Config {
            anthropic_api_key: String::new(),
            port: 0,
            rust_log: "info".to_string(),
            model: "claude-test".to_string(),
            temperature: 0.4,
            top_p: 0.9,
        }
    }

    fn app(transport: Arc<FixedTransport>) -> Router {
        build_router(AppState {
            llm: transport,
            config: config(),
        })
    }

    fn profile() -> Value {
        json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "base_roles": [
                {"company": "Acme Corp", "title": "Senior Engineer", "dates": "2018 - Present"}
            ],
            "education": [
                {"institution": "State University", "degree": "BSc Computer Science", "dates": "2014 - 2018"}
            ]
        })
    }

    fn model_reply() -> String {
        json!({
            "summary": "7+ years of experience building products. Shipped APIs. Scaled teams. Wrote Rust. Loves tests.",
            "skills": [
                "Languages: Rust, Go, Python, TypeScript, SQL",
                "Frontend: React, Angular, Vue, CSS, HTML",
                "Cloud: AWS, Docker, Kubernetes, Terraform, Linux"
            ],
            "experience": [{
                "company": "Acme Corp",
                "title": "Senior Engineer",
                "dates": "2018 - Present",
                "bullets": [
                    "Built services in Rust",
                    "Deployed to AWS",
                    "Wrote Python tooling",
                    "Mentored engineers",
                    "Automated releases"
                ]
            }]
        })
        .to_string()
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn transport(credential: bool) -> Arc<FixedTransport> {
        Arc::new(FixedTransport {
            credential,
            reply: model_reply(),
            calls: Mutex::new(0),
        })
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(transport(true))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_returns_post_processed_content() {
        let t = transport(true);
        let (status, body) = post_json(
            app(t.clone()),
            "/api/v1/resumes/generate",
            json!({
                "profile": profile(),
                "job_description": "Rust engineer, Vue frontend",
                "years_of_experience": "7+"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "body: {body}");
        assert_eq!(*t.calls.lock().unwrap(), 1);
        assert_eq!(body["years_of_experience"], "7+");
        assert_eq!(body["content"]["skills"][1], "Frontend: React, Vue, CSS, HTML");
        assert_eq!(
            body["content"]["experience"][0]["bullets"][0],
            "Built services in **Rust**"
        );
        assert_eq!(
            body["content"]["education"][0]["institution"],
            "State University"
        );
        assert!(body["generation_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_generate_without_credential_is_503() {
        let t = transport(false);
        let (status, body) = post_json(
            app(t.clone()),
            "/api/v1/resumes/generate",
            json!({
                "profile": profile(),
                "job_description": "Rust engineer",
                "years_of_experience": "7+"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");
        assert_eq!(*t.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_job_description() {
        let (status, body) = post_json(
            app(transport(true)),
            "/api/v1/resumes/generate",
            json!({"profile": profile(), "job_description": "   "}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_with_wrong_years_label_exhausts_repair() {
        let t = transport(true);
        let (status, body) = post_json(
            app(t.clone()),
            "/api/v1/resumes/generate",
            json!({
                "profile": profile(),
                "job_description": "Rust engineer",
                "years_of_experience": "12+"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("12+ years of experience"));
        assert_eq!(*t.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_validate_reports_issues_without_model_call() {
        let t = transport(true);
        let (status, body) = post_json(
            app(t.clone()),
            "/api/v1/resumes/validate",
            json!({
                "profile": profile(),
                "raw_output": format!("```json\n{}\n```", model_reply()),
                "years_of_experience": "7+"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["issues"], json!([]));
        assert_eq!(*t.calls.lock().unwrap(), 0);

        let (_, body) = post_json(
            app(t),
            "/api/v1/resumes/validate",
            json!({
                "profile": profile(),
                "raw_output": "no json here",
                "years_of_experience": "7+"
            }),
        )
        .await;
        assert_eq!(body["valid"], false);
        assert_eq!(body["issues"][0]["kind"], "invalid_json");
    }
}
