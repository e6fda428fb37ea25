//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling HTTP requests for the agenda
//! assistant. It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    models::{
        ErrorResponse, GeneratePayload, GenerateResponse, InterpretPayload, InterpretResponse,
        TaskView,
    },
    state::AppState,
};

const APPLIED_FALLBACK_TEXT: &str = "Agenda actualizada.";
const EMPTY_FALLBACK_TEXT: &str = "(Sin respuesta)";

pub enum ApiError {
    BadRequest(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}

/// Send a message to the assistant and apply any agenda action in its reply.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GeneratePayload,
    responses(
        (status = 200, description = "Assistant reply and updated agenda", body = GenerateResponse),
        (status = 400, description = "Missing prompt or message", body = ErrorResponse),
        (status = 500, description = "LLM provider failure", body = ErrorResponse)
    )
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GeneratePayload>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(payload) = payload.map_err(bad_body)?;
    let user_text = payload
        .user_text()
        .ok_or_else(|| ApiError::BadRequest("prompt or message is required".to_string()))?;

    let reply = state.assistant.respond(user_text).await?;

    let text = if !reply.text.is_empty() {
        reply.text
    } else if reply.action.is_some() {
        APPLIED_FALLBACK_TEXT.to_string()
    } else {
        EMPTY_FALLBACK_TEXT.to_string()
    };

    Ok(Json(GenerateResponse {
        text,
        agenda: reply.agenda.into_iter().map(TaskView::from).collect(),
    }))
}

/// Get the current agenda in chronological order.
#[utoipa::path(
    get,
    path = "/api/agenda",
    responses(
        (status = 200, description = "Current agenda", body = [TaskView])
    )
)]
pub async fn get_agenda(State(state): State<Arc<AppState>>) -> Json<Vec<TaskView>> {
    let agenda = state.assistant.agenda().await;
    Json(agenda.into_iter().map(TaskView::from).collect())
}

/// Ask the model to interpret a sentence as structured JSON. Does not modify the agenda.
#[utoipa::path(
    post,
    path = "/api/interpret",
    request_body = InterpretPayload,
    responses(
        (status = 200, description = "The model's structured interpretation", body = InterpretResponse),
        (status = 400, description = "Missing text", body = ErrorResponse),
        (status = 500, description = "LLM provider failure", body = ErrorResponse)
    )
)]
pub async fn interpret(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InterpretPayload>, JsonRejection>,
) -> Result<Json<InterpretResponse>, ApiError> {
    let Json(payload) = payload.map_err(bad_body)?;
    let text = payload
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("text is required".to_string()))?;

    let parsed = state
        .assistant
        .interpret(&state.interpret_prompt, text)
        .await?;
    info!("Interpretation completed");

    Ok(Json(InterpretResponse { ok: true, parsed }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::{
        assistant::AgendaAssistant,
        llm_client::{LLMClient, MockLLMClient},
        store::AgendaStore,
    };
    use anyhow::anyhow;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    struct FailingClient;

    #[async_trait]
    impl LLMClient for FailingClient {
        async fn generate(&self, _prompt: String) -> anyhow::Result<String> {
            Err(anyhow!("connection refused"))
        }
    }

    fn state_with(llm: Arc<dyn LLMClient>) -> Arc<AppState> {
        let store = Arc::new(Mutex::new(AgendaStore::new()));
        Arc::new(AppState {
            assistant: Arc::new(AgendaAssistant::new(llm, store, "SYSTEM".to_string())),
            interpret_prompt: Arc::new("Frase: {text}".to_string()),
        })
    }

    fn generate_payload(prompt: &str) -> Result<Json<GeneratePayload>, JsonRejection> {
        Ok(Json(GeneratePayload {
            prompt: Some(prompt.to_string()),
            message: None,
        }))
    }

    #[tokio::test]
    async fn test_generate_applies_action_and_returns_agenda() {
        let state = state_with(Arc::new(MockLLMClient::new(
            "Listo. {\"accion\":\"crear\",\"fecha\":\"2025-03-01\",\"hora\":\"09:00\",\"titulo\":\"Dentista\"}",
        )));

        let result = generate(State(state.clone()), generate_payload("dentista")).await;
        let Ok(Json(body)) = result else {
            panic!("Expected a successful response");
        };

        assert_eq!(body.text, "Listo.");
        assert_eq!(body.agenda.len(), 1);
        assert_eq!(body.agenda[0].title, "Dentista");

        let Json(agenda) = get_agenda(State(state)).await;
        assert_eq!(agenda, body.agenda);
    }

    #[tokio::test]
    async fn test_generate_uses_fallback_text_when_reply_is_only_json() {
        let state = state_with(Arc::new(MockLLMClient::new(
            "{\"accion\":\"crear\",\"fecha\":\"2025-03-01\",\"hora\":\"09:00\",\"titulo\":\"Gym\"}",
        )));

        let Ok(Json(body)) = generate(State(state), generate_payload("gym")).await else {
            panic!("Expected a successful response");
        };
        assert_eq!(body.text, APPLIED_FALLBACK_TEXT);
    }

    #[tokio::test]
    async fn test_generate_accepts_message_field() {
        let state = state_with(Arc::new(MockLLMClient::new("Hola")));
        let payload = Ok(Json(GeneratePayload {
            prompt: None,
            message: Some("hola".to_string()),
        }));

        let Ok(Json(body)) = generate(State(state), payload).await else {
            panic!("Expected a successful response");
        };
        assert_eq!(body.text, "Hola");
        assert!(body.agenda.is_empty());
    }

    #[tokio::test]
    async fn test_generate_missing_input_is_bad_request() {
        let state = state_with(Arc::new(MockLLMClient::new("unused")));
        let payload = Ok(Json(GeneratePayload::default()));

        let response = generate(State(state.clone()), payload)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.assistant.agenda().await.is_empty());
    }

    #[tokio::test]
    async fn test_generate_provider_failure_is_internal_error() {
        let state = state_with(Arc::new(FailingClient));

        let response = generate(State(state), generate_payload("hola"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_generate_malformed_json_still_succeeds() {
        let state = state_with(Arc::new(MockLLMClient::new("Vale {\"accion\": crear")));
        // No closing brace, so nothing is located and the reply is returned as-is.
        let Ok(Json(body)) = generate(State(state.clone()), generate_payload("x")).await else {
            panic!("Expected a successful response");
        };
        assert_eq!(body.text, "Vale {\"accion\": crear");

        let state = state_with(Arc::new(MockLLMClient::new("Vale {\"accion\": crear}")));
        let Ok(Json(body)) = generate(State(state), generate_payload("x")).await else {
            panic!("Expected a successful response");
        };
        assert_eq!(body.text, "Vale");
        assert!(body.agenda.is_empty());
    }

    #[tokio::test]
    async fn test_interpret_returns_parsed_json() {
        let state = state_with(Arc::new(MockLLMClient::new(
            "{\"title\":\"Recoger a mamá\",\"action\":\"create\",\"urgency\":4}",
        )));
        let payload = Ok(Json(InterpretPayload {
            text: Some("recoger a mamá".to_string()),
        }));

        let Ok(Json(body)) = interpret(State(state.clone()), payload).await else {
            panic!("Expected a successful response");
        };
        assert!(body.ok);
        assert_eq!(body.parsed["urgency"], json!(4));
        assert!(state.assistant.agenda().await.is_empty());
    }

    #[tokio::test]
    async fn test_interpret_missing_text_is_bad_request() {
        let state = state_with(Arc::new(MockLLMClient::new("unused")));
        let payload = Ok(Json(InterpretPayload { text: None }));

        let response = interpret(State(state), payload).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
