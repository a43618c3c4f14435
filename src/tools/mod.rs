// src/tools/mod.rs
// Tool declarations and routing of tool calls to lookup providers

pub mod news;
pub mod web_search;

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{NewsdeskError, Result};
use crate::llm::assistant::types::{AssistantTool, FunctionCall, ToolCall, ToolOutput};

pub use news::{NewsApiClient, NewsArgs, NewsProvider};
pub use web_search::{SearchDepth, TavilyClient, WebSearchArgs, WebSearchProvider};

/// Tools the assistant may call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    WebSearch,
    News,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::News, ToolKind::WebSearch];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::WebSearch => web_search::WEB_SEARCH_TOOL,
            ToolKind::News => news::NEWS_TOOL,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            web_search::WEB_SEARCH_TOOL | web_search::WEB_SEARCH_TOOL_ALIAS => Some(ToolKind::WebSearch),
            news::NEWS_TOOL => Some(ToolKind::News),
            _ => None,
        }
    }

    pub fn definition(&self) -> AssistantTool {
        let function = match self {
            ToolKind::WebSearch => web_search::web_search_tool_definition(),
            ToolKind::News => news::news_tool_definition(),
        };
        AssistantTool::Function { function }
    }
}

/// Tool declarations registered on the assistant
pub fn tool_definitions() -> Vec<AssistantTool> {
    ToolKind::ALL.iter().map(ToolKind::definition).collect()
}

/// A decoded tool call
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    WebSearch(WebSearchArgs),
    News(NewsArgs),
}

impl ToolRequest {
    pub fn parse(call: &FunctionCall) -> Result<Self> {
        let kind = ToolKind::from_name(&call.name)
            .ok_or_else(|| NewsdeskError::InvalidInput(format!("unknown function {}", call.name)))?;
        let request = match kind {
            ToolKind::WebSearch => ToolRequest::WebSearch(serde_json::from_str(&call.arguments)?),
            ToolKind::News => ToolRequest::News(serde_json::from_str(&call.arguments)?),
        };
        Ok(request)
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolRequest::WebSearch(_) => ToolKind::WebSearch,
            ToolRequest::News(_) => ToolKind::News,
        }
    }
}

/// Routes tool calls to the lookup providers.
#[derive(Clone)]
pub struct ToolDispatcher {
    news: Arc<dyn NewsProvider>,
    web_search: Arc<dyn WebSearchProvider>,
}

impl ToolDispatcher {
    pub fn new(news: Arc<dyn NewsProvider>, web_search: Arc<dyn WebSearchProvider>) -> Self {
        Self { news, web_search }
    }

    /// Answer one tool call. Always yields an output for the call id.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolOutput {
        let name = call.function.name.as_str();
        let output = match self.invoke(&call.function).await {
            Ok(text) => text,
            Err(e) => {
                warn!(tool = %name, call_id = %call.id, error = %e, "Error executing function");
                format!("Error executing function: {}: {}", name, e)
            }
        };
        ToolOutput {
            tool_call_id: call.id.clone(),
            output,
        }
    }

    /// Answer every call of one batch, one at a time, in request order.
    pub async fn service_batch(&self, calls: &[ToolCall]) -> Vec<ToolOutput> {
        let mut outputs = Vec::with_capacity(calls.len());
        for call in calls {
            outputs.push(self.dispatch(call).await);
        }
        outputs
    }

    async fn invoke(&self, function: &FunctionCall) -> Result<String> {
        match ToolRequest::parse(function)? {
            ToolRequest::WebSearch(args) => {
                info!(query = %args.query, depth = %args.search_depth, "Executing web search");
                Ok(self.web_search.search(&args.query, args.search_depth).await?)
            }
            ToolRequest::News(args) => {
                let articles = self.news.get_news(&args.topic).await?;
                info!(topic = %args.topic, articles = articles.len(), "News output received");
                Ok(articles.concat())
            }
        }
    }
}
