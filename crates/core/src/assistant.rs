//! Agenda Assistant Service
//!
//! Drives one request end to end: compose the prompt from the current
//! agenda, call the model, interpret its reply and apply the resulting
//! action to the shared store.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    interpreter::ResponseInterpreter,
    llm_client::LLMClient,
    prompt::{compose_interpret_prompt, compose_prompt},
    store::AgendaStore,
    task::{Action, Task},
};

/// The outcome of one agenda turn.
#[derive(Debug, Clone)]
pub struct AssistantReply {
    /// The model's reply with the action payload removed. May be empty.
    pub text: String,
    /// The agenda after the action (if any) was applied.
    pub agenda: Vec<Task>,
    /// The action that was applied, after relative dates were resolved.
    pub action: Option<Action>,
}

pub struct AgendaAssistant {
    llm: Arc<dyn LLMClient>,
    store: Arc<Mutex<AgendaStore>>,
    interpreter: ResponseInterpreter,
    system_prompt: String,
}

impl AgendaAssistant {
    /// Creates a new assistant.
    ///
    /// # Arguments
    ///
    /// * `llm` - The model client used for every turn.
    /// * `store` - The shared agenda. Locked only around reads and `apply`.
    /// * `system_prompt` - Instructions describing the action JSON format.
    pub fn new(
        llm: Arc<dyn LLMClient>,
        store: Arc<Mutex<AgendaStore>>,
        system_prompt: String,
    ) -> Self {
        Self {
            llm,
            store,
            interpreter: ResponseInterpreter::default(),
            system_prompt,
        }
    }

    /// Replaces the default greedy interpreter.
    pub fn with_interpreter(mut self, interpreter: ResponseInterpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Handles one user message, dated against the local calendar.
    pub async fn respond(&self, user_text: &str) -> Result<AssistantReply> {
        self.respond_on(user_text, Local::now().date_naive()).await
    }

    /// Handles one user message with an explicit reference date.
    ///
    /// If the model call fails the store is left untouched.
    pub async fn respond_on(&self, user_text: &str, today: NaiveDate) -> Result<AssistantReply> {
        let current = self.store.lock().await.snapshot();
        let prompt = compose_prompt(&self.system_prompt, &current, today, user_text);

        // No lock is held while the request is in flight.
        let raw = self
            .llm
            .generate(prompt)
            .await
            .context("Failed to get a reply from the LLM provider")?;

        let extraction = self.interpreter.extract(&raw);
        let mut action = extraction.action;
        if let Some(action) = action.as_mut() {
            action.resolve_relative_dates(today);
        }

        let agenda = {
            let mut store = self.store.lock().await;
            store.apply(action.as_ref())
        };

        info!(
            applied = action.is_some(),
            agenda_len = agenda.len(),
            "Agenda turn completed"
        );

        Ok(AssistantReply {
            text: extraction.clean_text,
            agenda,
            action,
        })
    }

    /// Current agenda snapshot.
    pub async fn agenda(&self) -> Vec<Task> {
        self.store.lock().await.snapshot()
    }

    /// Asks the model to interpret a sentence and returns its JSON verbatim.
    ///
    /// Falls back to `{"raw": reply}` when the reply holds no parseable JSON.
    /// Never touches the agenda.
    pub async fn interpret(&self, template: &str, user_text: &str) -> Result<Value> {
        let prompt = compose_interpret_prompt(template, user_text);
        let raw = self
            .llm
            .generate(prompt)
            .await
            .context("Failed to get a reply from the LLM provider")?;

        Ok(match self.interpreter.extract_value(&raw) {
            Some(value) => value,
            None => {
                warn!("Interpretation reply contained no JSON; returning raw text");
                json!({ "raw": raw })
            }
        })
    }
}
