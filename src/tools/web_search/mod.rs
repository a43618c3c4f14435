// src/tools/web_search/mod.rs

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::llm::assistant::types::FunctionDefinition;

pub use client::TavilyClient;

/// Function name the assistant calls for web search
pub const WEB_SEARCH_TOOL: &str = "search_web";
/// Name used by assistants created with the earlier tool declaration
pub const WEB_SEARCH_TOOL_ALIAS: &str = "tavily_search";

/// Results requested per search
pub const MAX_RESULTS: u32 = 5;

/// Function definition for search_web
pub fn web_search_tool_definition() -> FunctionDefinition {
    FunctionDefinition {
        name: WEB_SEARCH_TOOL.to_string(),
        description: "Search the web for current information on a given topic".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to look up on the web"
                },
                "search_depth": {
                    "type": "string",
                    "enum": ["basic", "advanced"],
                    "description": "The depth of search - basic is faster, advanced is more comprehensive"
                }
            },
            "required": ["query"]
        }),
    }
}

/// Arguments for the search_web function
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WebSearchArgs {
    pub query: String,
    #[serde(default, deserialize_with = "lenient_depth")]
    pub search_depth: SearchDepth,
}

/// `null`, non-string and unrecognised depths fall back to the default.
fn lenient_depth<'de, D>(deserializer: D) -> Result<SearchDepth, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    #[serde(alias = "deep")]
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

impl fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(SearchDepth::Basic),
            "advanced" | "deep" => Ok(SearchDepth::Advanced),
            other => Err(format!("unknown search depth: {}", other)),
        }
    }
}

/// Web search lookup. Implementations report failures as descriptive text;
/// an `Err` means something unexpected went wrong.
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    async fn search(&self, query: &str, depth: SearchDepth) -> anyhow::Result<String>;
}
