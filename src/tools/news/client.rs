// src/tools/news/client.rs
// NewsAPI "everything" search

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{NewsProvider, PAGE_SIZE};
use crate::config::AppConfig;

/// NewsAPI response envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsResponse {
    status: String,
    #[serde(default)]
    total_results: u64,
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    source: Option<ArticleSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    #[allow(dead_code)]
    content: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

impl Article {
    fn format(&self) -> String {
        format!(
            "\nTitle: {}\nAuthor: {}\nSource: {}\nDescription: {}\nURL: {}\n",
            self.title.as_deref().unwrap_or("Untitled"),
            self.author.as_deref().unwrap_or("Unknown"),
            self.source
                .as_ref()
                .and_then(|s| s.name.as_deref())
                .unwrap_or("Unknown"),
            self.description.as_deref().unwrap_or(""),
            self.url.as_deref().unwrap_or(""),
        )
    }
}

pub struct NewsApiClient {
    api_key: Option<String>,
    base_url: String,
    http_client: Client,
}

impl NewsApiClient {
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
        Self::new(config.news_api_key.clone(), config.news_api_base_url.clone(), http_client)
    }

    async fn fetch(&self, api_key: &str, topic: &str) -> Result<Vec<String>, String> {
        let url = format!("{}/v2/everything", self.base_url.trim_end_matches('/'));
        let page_size = PAGE_SIZE.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", topic), ("apiKey", api_key), ("pageSize", page_size.as_str())])
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(format!("NewsAPI returned {}", status));
        }

        let body: NewsResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed NewsAPI response: {}", e))?;
        debug!(status = %body.status, total_results = body.total_results, "NewsAPI response");

        Ok(body
            .articles
            .iter()
            .take(PAGE_SIZE as usize)
            .map(Article::format)
            .collect())
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn get_news(&self, topic: &str) -> anyhow::Result<Vec<String>> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("NEWS_API_KEY not set, returning no articles");
            return Ok(Vec::new());
        };

        let start_time = Instant::now();
        match self.fetch(api_key, topic).await {
            Ok(articles) => {
                info!(
                    topic = %topic,
                    articles = articles.len(),
                    duration_ms = start_time.elapsed().as_millis() as u64,
                    "News lookup complete"
                );
                Ok(articles)
            }
            Err(e) => {
                warn!(topic = %topic, error = %e, "Error fetching news");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_article_format() {
        let response: NewsResponse = serde_json::from_value(json!({
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": { "id": null, "name": "CoinDesk" },
                "author": "Jane Doe",
                "title": "Bitcoin tops $100k",
                "description": "A new high.",
                "content": "Full text...",
                "url": "https://example.com/btc"
            }]
        }))
        .unwrap();

        assert_eq!(
            response.articles[0].format(),
            "\nTitle: Bitcoin tops $100k\nAuthor: Jane Doe\nSource: CoinDesk\nDescription: A new high.\nURL: https://example.com/btc\n"
        );
    }

    #[test]
    fn test_article_format_null_fields() {
        let article: Article = serde_json::from_value(json!({
            "source": { "name": null },
            "author": null,
            "title": "Untitled wire story",
            "description": null,
            "content": null,
            "url": "https://example.com/wire"
        }))
        .unwrap();

        let text = article.format();
        assert!(text.contains("Author: Unknown"));
        assert!(text.contains("Source: Unknown"));
    }

    #[tokio::test]
    async fn test_missing_key_returns_empty() {
        let client = NewsApiClient::new(None, "http://127.0.0.1:9", Client::new());
        assert!(client.get_news("bitcoin").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_returns_empty() {
        let client = NewsApiClient::new(Some("key".to_string()), "http://127.0.0.1:9", Client::new());
        assert!(client.get_news("bitcoin").await.unwrap().is_empty());
    }
}
