// src/llm/client.rs
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

use crate::config::AppConfig;
use crate::error::{NewsdeskError, Result};

/// Header value opting in to the v2 assistants surface
const ASSISTANTS_BETA: &str = "assistants=v2";

#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("newsdesk/0.1")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_base: api_base.into(),
        })
    }

    /// Build a client from configuration; the API key is required.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or_else(|| NewsdeskError::Config("OPENAI_API_KEY not set".to_string()))?;
        Self::new(api_key, config.openai_base_url.clone(), config.http_timeout())
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Universal request builder for all assistant JSON endpoints
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(
                method,
                format!("{}/{}", self.api_base.trim_end_matches('/'), path.trim_start_matches('/')),
            )
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("OpenAI-Beta", ASSISTANTS_BETA)
    }

    /// Send a request and decode a JSON body, mapping non-2xx into `NewsdeskError::Api`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);
    warn!(status = status.as_u16(), message = %message, "Assistant API request failed");

    Err(NewsdeskError::Api {
        status: status.as_u16(),
        message,
    })
}
