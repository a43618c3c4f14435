// src/services/mod.rs

pub mod briefing;

pub use briefing::{Briefing, NewsAssistant};
