// src/config/mod.rs
// Load all settings from the process environment (and .env), with defaults

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, warn};

use crate::dispatch::PollPolicy;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org";
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    // ── Assistant service
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,

    // ── Lookup providers
    pub news_api_key: Option<String>,
    pub news_api_base_url: String,
    pub tavily_api_key: Option<String>,
    pub tavily_base_url: String,

    // ── Run polling
    pub poll_interval_ms: u64,
    /// 0 means poll until the run reaches a terminal status
    pub max_poll_attempts: u32,
    pub http_timeout: u64,

    // ── Session identifiers
    pub session_file: PathBuf,
    pub assistant_id: Option<String>,
    pub thread_id: Option<String>,

    // ── Form server
    pub host: String,
    pub port: u16,

    // ── Logging
    pub log_level: String,
}

/// Parse `key` from `lookup`, stripping trailing `# comments` and whitespace.
fn env_var_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    warn!(key = key, value = %val, "Config value failed to parse, using default");
                    default
                }
            }
        }
        None => default,
    }
}

/// Read an optional secret or identifier; blank values count as unset.
fn optional_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `NEWSDESK_LOG_LEVEL`, readable before the rest of the configuration so
/// logging can be installed first.
pub fn log_level_from<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    env_var_or(lookup, "NEWSDESK_LOG_LEVEL", DEFAULT_LOG_LEVEL.to_string())
}

/// Load `.env` into the process environment; returns false when there is none.
pub fn load_dotenv() -> bool {
    dotenvy::dotenv().is_ok()
}

impl AppConfig {
    /// Load `.env` (if present) and read configuration from the environment.
    pub fn from_env() -> Self {
        if !load_dotenv() {
            debug!(".env file not found, using process environment only");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            openai_api_key: optional_var(&lookup, "OPENAI_API_KEY"),
            openai_base_url: env_var_or(&lookup, "OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL.to_string()),
            model: env_var_or(&lookup, "NEWSDESK_MODEL", "gpt-4o-mini".to_string()),
            news_api_key: optional_var(&lookup, "NEWS_API_KEY"),
            news_api_base_url: env_var_or(&lookup, "NEWS_API_BASE_URL", DEFAULT_NEWS_API_BASE_URL.to_string()),
            tavily_api_key: optional_var(&lookup, "TAVILY_API_KEY"),
            tavily_base_url: env_var_or(&lookup, "TAVILY_BASE_URL", DEFAULT_TAVILY_BASE_URL.to_string()),
            poll_interval_ms: env_var_or(&lookup, "NEWSDESK_POLL_INTERVAL_MS", 5000),
            max_poll_attempts: env_var_or(&lookup, "NEWSDESK_MAX_POLL_ATTEMPTS", 120),
            http_timeout: env_var_or(&lookup, "NEWSDESK_HTTP_TIMEOUT", 60),
            session_file: env_var_or(&lookup, "NEWSDESK_SESSION_FILE", PathBuf::from("newsdesk_session.json")),
            assistant_id: optional_var(&lookup, "NEWSDESK_ASSISTANT_ID"),
            thread_id: optional_var(&lookup, "NEWSDESK_THREAD_ID"),
            host: env_var_or(&lookup, "NEWSDESK_HOST", "127.0.0.1".to_string()),
            port: env_var_or(&lookup, "NEWSDESK_PORT", 8501),
            log_level: log_level_from(&lookup),
        };
        config.log_status();
        config
    }

    // --- Convenience Methods ---

    /// Polling cadence for the dispatch loop
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: (self.max_poll_attempts > 0).then_some(self.max_poll_attempts),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Log which keys are available (without exposing values)
    fn log_status(&self) {
        let mut available = Vec::new();
        if self.openai_api_key.is_some() {
            available.push("OpenAI");
        }
        if self.news_api_key.is_some() {
            available.push("NewsAPI");
        }
        if self.tavily_api_key.is_some() {
            available.push("Tavily");
        }
        if available.is_empty() {
            warn!("No API keys configured");
        } else {
            debug!(keys = ?available, "API keys loaded");
        }
    }
}
