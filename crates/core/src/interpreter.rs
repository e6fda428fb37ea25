//! Response Interpreter
//!
//! Turns a model's free-text reply into user-facing text plus an optional
//! [`Action`]. The model is instructed to embed a JSON object in its reply,
//! but nothing here assumes it actually did so correctly: every failure
//! degrades to "no action".

use serde_json::{Map, Value};
use std::ops::Range;
use tracing::debug;

use crate::task::{Action, DeleteFilter, Task};

const KIND_KEYS: &[&str] = &["accion", "acción", "action", "kind", "tipo"];
const DATE_KEYS: &[&str] = &["fecha", "date"];
const TIME_KEYS: &[&str] = &["hora", "time"];
const TITLE_KEYS: &[&str] = &["titulo", "título", "title"];
const DESCRIPTION_KEYS: &[&str] = &["texto", "descripcion", "descripción", "description"];

/// Finds the byte range of an embedded JSON payload inside free text.
pub trait JsonLocator: Send + Sync {
    fn locate(&self, text: &str) -> Option<Range<usize>>;
}

/// Spans from the first `{` to the last `}` in the text.
///
/// This is not a balanced-brace parse: prose containing literal braces, or
/// several JSON fragments, produces a span that usually fails to parse. If
/// the span is directly wrapped in `[` ... `]` it is widened to capture the
/// whole array.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyBraceLocator;

impl JsonLocator for GreedyBraceLocator {
    fn locate(&self, text: &str) -> Option<Range<usize>> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end < start {
            return None;
        }

        let before = text[..start].trim_end();
        let after = text[end + 1..].trim_start();
        if before.ends_with('[') && after.starts_with(']') {
            let open = before.len() - 1;
            let close = text.len() - after.len();
            return Some(open..close + 1);
        }
        Some(start..end + 1)
    }
}

/// The result of interpreting one model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The reply with the JSON payload removed, trimmed. May be empty.
    pub clean_text: String,
    pub action: Option<Action>,
}

pub struct ResponseInterpreter {
    locator: Box<dyn JsonLocator>,
}

impl Default for ResponseInterpreter {
    fn default() -> Self {
        Self::new(Box::new(GreedyBraceLocator))
    }
}

impl ResponseInterpreter {
    pub fn new(locator: Box<dyn JsonLocator>) -> Self {
        Self { locator }
    }

    /// Separates the embedded action (if any) from the readable text.
    ///
    /// When the payload holds several candidates only the first valid one is
    /// returned.
    pub fn extract(&self, raw_text: &str) -> Extraction {
        let Some(span) = self.locator.locate(raw_text) else {
            return Extraction {
                clean_text: raw_text.trim().to_string(),
                action: None,
            };
        };

        let clean_text = format!("{}{}", &raw_text[..span.start], &raw_text[span.end..])
            .trim()
            .to_string();

        let action = match serde_json::from_str::<Value>(&raw_text[span]) {
            Ok(value) => first_valid_action(value),
            Err(e) => {
                debug!(error = %e, "Discarding malformed JSON in model reply");
                None
            }
        };

        Extraction { clean_text, action }
    }

    /// Returns the JSON value embedded in the reply without interpreting it.
    ///
    /// The whole reply is tried first, then the located span.
    pub fn extract_value(&self, raw_text: &str) -> Option<Value> {
        if let Ok(value) = serde_json::from_str::<Value>(raw_text.trim()) {
            return Some(value);
        }
        let span = self.locator.locate(raw_text)?;
        serde_json::from_str(&raw_text[span]).ok()
    }
}

fn first_valid_action(value: Value) -> Option<Action> {
    let candidates = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    let total = candidates.len();

    let mut valid = candidates.iter().enumerate().filter_map(|(i, c)| {
        let action = normalize(c);
        if action.is_none() {
            debug!(index = i, "Ignoring candidate without a recognizable action");
        }
        action
    });
    let first = valid.next();
    if first.is_some() && total > 1 {
        debug!(candidates = total, "Multiple candidates in reply; applying the first valid one");
    }
    first
}

/// Maps one decoded JSON object to an [`Action`], or `None` when it does not
/// carry a create/delete kind.
fn normalize(candidate: &Value) -> Option<Action> {
    let obj = candidate.as_object()?;
    let kind = field(obj, KIND_KEYS)?.trim().to_lowercase();

    match kind.as_str() {
        "crear" | "create" | "agregar" | "añadir" | "add" => Some(Action::Create(Task {
            date: field(obj, DATE_KEYS).unwrap_or_default(),
            time: field(obj, TIME_KEYS).unwrap_or_default(),
            title: field(obj, TITLE_KEYS).unwrap_or_default(),
            description: field(obj, DESCRIPTION_KEYS),
        })),
        "borrar" | "delete" | "eliminar" | "remove" | "cancelar" | "cancel" => {
            Some(Action::Delete(DeleteFilter {
                title: field(obj, TITLE_KEYS).unwrap_or_default(),
                date: field(obj, DATE_KEYS).filter(|d| !d.trim().is_empty()),
                time: field(obj, TIME_KEYS).filter(|t| !t.trim().is_empty()),
            }))
        }
        _ => None,
    }
}

/// First scalar value found under any of `keys`, as text.
fn field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}
