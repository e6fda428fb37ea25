//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds all shared,
//! clonable resources handed to the handlers.

use agenda_core::assistant::AgendaAssistant;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
/// All fields are public to be accessible from other modules.
#[derive(Clone)]
pub struct AppState {
    /// Owns the single agenda instance for the lifetime of the process.
    pub assistant: Arc<AgendaAssistant>,
    /// Template for the `/api/interpret` endpoint, with a `{text}` placeholder.
    pub interpret_prompt: Arc<String>,
}
