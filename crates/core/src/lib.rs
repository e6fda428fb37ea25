//! Agenda Core
//!
//! Domain logic for the agenda assistant: decoding actions from model
//! replies, the ordered in-memory agenda, prompt composition and the LLM
//! client abstraction.

pub mod assistant;
pub mod dates;
pub mod interpreter;
pub mod llm_client;
pub mod prompt;
pub mod store;
pub mod task;
