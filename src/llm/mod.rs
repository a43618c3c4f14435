// src/llm/mod.rs
// Assistant service client and the assistants/threads/runs surface

pub mod assistant;
pub mod client;

// Export the main client
pub use client::OpenAIClient;
