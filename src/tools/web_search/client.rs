// src/tools/web_search/client.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{SearchDepth, WebSearchProvider, MAX_RESULTS};
use crate::config::AppConfig;

pub const MISSING_KEY_MESSAGE: &str = "Error: Tavily API key not configured";
pub const NO_RESULTS_MESSAGE: &str = "No results found";

#[derive(Debug, Serialize)]
struct TavilySearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    results: Option<Vec<TavilyResult>>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: Option<String>,
    content: Option<String>,
}

/// Tavily search client - optimized for AI agents
pub struct TavilyClient {
    api_key: Option<String>,
    base_url: String,
    http_client: Client,
}

impl TavilyClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>, http_client: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            http_client,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let http_client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::new(config.tavily_api_key.clone(), config.tavily_base_url.clone(), http_client)
    }

    async fn request(&self, api_key: &str, query: &str, depth: SearchDepth) -> Result<String, String> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let request = TavilySearchRequest {
            api_key,
            query,
            search_depth: depth.as_str(),
            max_results: MAX_RESULTS,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("Tavily API error {}: {}", status, error_text));
        }

        let body: TavilySearchResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Tavily response: {}", e))?;

        match body.results {
            Some(results) if !results.is_empty() => Ok(format_results(&results)),
            _ => Ok(NO_RESULTS_MESSAGE.to_string()),
        }
    }
}

#[async_trait]
impl WebSearchProvider for TavilyClient {
    async fn search(&self, query: &str, depth: SearchDepth) -> anyhow::Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Tavily API key not found in environment variables");
            return Ok(MISSING_KEY_MESSAGE.to_string());
        };

        let start_time = Instant::now();
        debug!(query = %query, depth = %depth, "Executing Tavily search");

        let output = match self.request(api_key, query, depth).await {
            Ok(text) => text,
            Err(e) => {
                let error_message = format!("Tavily search error: {}", e);
                warn!(query = %query, "{}", error_message);
                error_message
            }
        };

        info!(
            query = %query,
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Tavily search complete"
        );
        Ok(output)
    }
}

fn format_results(results: &[TavilyResult]) -> String {
    let mut formatted = String::from("Search Results:\n\n");
    for (i, result) in results.iter().enumerate() {
        let _ = write!(
            formatted,
            "Result {}:\nTitle: {}\nContent: {}\n\n",
            i + 1,
            result.title.as_deref().unwrap_or("No title"),
            result.content.as_deref().unwrap_or("No content"),
        );
    }
    formatted
}
