//! API Models
//!
//! Request and response bodies for the REST API, annotated for OpenAPI
//! documentation with `utoipa`.

use agenda_core::task::Task;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// One agenda entry as exposed over HTTP.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct TaskView {
    #[schema(example = "2025-03-01")]
    pub date: String,
    #[schema(example = "09:00")]
    pub time: String,
    #[schema(example = "Dentista")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Revisión")]
    pub description: Option<String>,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        Self {
            date: task.date,
            time: task.time,
            title: task.title,
            description: task.description,
        }
    }
}

/// Either `prompt` or `message` carries the user's text.
#[derive(Deserialize, ToSchema, Debug, Default)]
pub struct GeneratePayload {
    #[schema(example = "Apúntame el dentista mañana a las 9")]
    pub prompt: Option<String>,
    pub message: Option<String>,
}

impl GeneratePayload {
    /// The user's text, preferring `prompt`. Blank values count as absent.
    pub fn user_text(&self) -> Option<&str> {
        [self.prompt.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct GenerateResponse {
    pub text: String,
    pub agenda: Vec<TaskView>,
}

#[derive(Deserialize, ToSchema, Debug, Default)]
pub struct InterpretPayload {
    #[schema(example = "Recoger a mamá el martes a las 16:10")]
    pub text: Option<String>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct InterpretResponse {
    pub ok: bool,
    #[schema(value_type = Object)]
    pub parsed: Value,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_payload_accepts_prompt_or_message() {
        let payload: GeneratePayload = serde_json::from_str(r#"{"prompt": "hola"}"#).unwrap();
        assert_eq!(payload.user_text(), Some("hola"));

        let payload: GeneratePayload = serde_json::from_str(r#"{"message": " hey "}"#).unwrap();
        assert_eq!(payload.user_text(), Some("hey"));
    }

    #[test]
    fn test_generate_payload_blank_prompt_falls_back_to_message() {
        let payload: GeneratePayload =
            serde_json::from_str(r#"{"prompt": "  ", "message": "hola"}"#).unwrap();
        assert_eq!(payload.user_text(), Some("hola"));
    }

    #[test]
    fn test_generate_payload_missing_text() {
        let payload: GeneratePayload = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(payload.user_text(), None);
    }

    #[test]
    fn test_task_view_from_task() {
        let view = TaskView::from(Task {
            date: "2025-01-01".to_string(),
            time: "10:00".to_string(),
            title: "Gym".to_string(),
            description: None,
        });
        let json = serde_json::to_string(&view).unwrap();
        assert_eq!(json, r#"{"date":"2025-01-01","time":"10:00","title":"Gym"}"#);
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            message: "prompt or message is required".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"message":"prompt or message is required"}"#);
    }
}
