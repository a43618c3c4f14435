// src/tools/news/mod.rs

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::llm::assistant::types::FunctionDefinition;

pub use client::NewsApiClient;

/// Function name the assistant calls for news articles
pub const NEWS_TOOL: &str = "get_news";

/// Articles requested per lookup
pub const PAGE_SIZE: u32 = 5;

/// Function definition for get_news
pub fn news_tool_definition() -> FunctionDefinition {
    FunctionDefinition {
        name: NEWS_TOOL.to_string(),
        description: "Get the list of articles/news for the given topic".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "The topic for the news, e.g. bitcoin"
                }
            },
            "required": ["topic"]
        }),
    }
}

/// Arguments for the get_news function
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewsArgs {
    pub topic: String,
}

/// News lookup. Upstream failures yield an empty list; an `Err` means
/// something unexpected went wrong.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn get_news(&self, topic: &str) -> anyhow::Result<Vec<String>>;
}
