// src/llm/assistant/mod.rs

pub mod api;
pub mod manager;
pub mod run;
pub mod types;

pub use api::AssistantsApi;
pub use manager::{ConversationSession, SessionIds};
pub use run::{start_run, RunHandle};
