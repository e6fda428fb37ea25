//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        ErrorResponse, GeneratePayload, GenerateResponse, InterpretPayload, InterpretResponse,
        TaskView,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::generate,
        handlers::get_agenda,
        handlers::interpret,
    ),
    components(
        schemas(TaskView, GeneratePayload, GenerateResponse, InterpretPayload, InterpretResponse, ErrorResponse)
    ),
    tags(
        (name = "Agenda API", description = "LLM-backed agenda assistant")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/api/generate", post(handlers::generate))
        .route("/api/agenda", get(handlers::get_agenda))
        .route("/api/interpret", post(handlers::interpret))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::{assistant::AgendaAssistant, llm_client::MockLLMClient, store::AgendaStore};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use serde_json::Value;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let store = Arc::new(Mutex::new(AgendaStore::new()));
        let llm = Arc::new(MockLLMClient::new("Hola"));
        create_router(Arc::new(AppState {
            assistant: Arc::new(AgendaAssistant::new(llm, store, "SYSTEM".to_string())),
            interpret_prompt: Arc::new("{text}".to_string()),
        }))
    }

    fn post_json(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).expect("error responses must be JSON")
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_json_bad_request() {
        let response = test_router()
            .oneshot(post_json("/api/generate", "{\"prompt\": "))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_wrongly_typed_body_is_json_bad_request() {
        let response = test_router()
            .oneshot(post_json("/api/interpret", "{\"text\": 42}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_json_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate")
            .body(Body::from("{\"prompt\": \"hola\"}"))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_generate_through_router() {
        let response = test_router()
            .oneshot(post_json("/api/generate", "{\"message\": \"hola\"}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["text"], "Hola");
        assert_eq!(body["agenda"], serde_json::json!([]));
    }

    #[test]
    fn test_openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| *p == "/api/generate"));
        assert!(paths.iter().any(|p| *p == "/api/agenda"));
        assert!(paths.iter().any(|p| *p == "/api/interpret"));
    }
}
