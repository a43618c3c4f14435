// src/services/briefing.rs
// One topic submission end to end: session setup, run, tool dispatch, summary

use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::DateTime;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::dispatch::DispatchLoop;
use crate::error::{NewsdeskError, Result};
use crate::llm::assistant::types::{MessageRole, RunStep};
use crate::llm::assistant::{start_run, AssistantsApi, ConversationSession, SessionIds};
use crate::llm::OpenAIClient;
use crate::tools::{tool_definitions, NewsApiClient, TavilyClient, ToolDispatcher};

pub const ASSISTANT_NAME: &str = "News and Search Assistant";

pub const ASSISTANT_INSTRUCTIONS: &str = "You are a personal assistant that can summarize news articles \
and search the web for information. Use the search_web function when you need to find current \
information on the web, and use the get_news function when you specifically need news articles on a topic.";

pub const RUN_INSTRUCTIONS: &str = "Summarize the news";

/// Shown when a run completes without a text reply
pub const EMPTY_SUMMARY: &str = "No summary was produced.";

/// The user message posted for `topic`
pub fn user_prompt(topic: &str) -> String {
    format!("Summarize content on this topic {} ", topic)
}

/// Outcome of one submission
#[derive(Debug, Clone)]
pub struct Briefing {
    pub topic: String,
    pub run_id: String,
    pub summary: Option<String>,
    pub steps: Vec<RunStep>,
}

impl Briefing {
    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or(EMPTY_SUMMARY)
    }

    /// Numbered dump of the run's steps
    pub fn render_steps(&self) -> String {
        let mut out = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            let created = DateTime::from_timestamp(step.created_at, 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| step.created_at.to_string());
            let details = serde_json::to_string_pretty(&step.step_details).unwrap_or_default();
            let _ = writeln!(
                out,
                "{}. {} [{}] {} ({})\n{}",
                i + 1,
                step.step_type,
                step.status,
                step.id,
                created,
                details
            );
        }
        out
    }
}

pub struct NewsAssistant {
    session: ConversationSession,
    dispatch: DispatchLoop,
    session_file: Option<PathBuf>,
}

impl NewsAssistant {
    pub fn new(session: ConversationSession, dispatch: DispatchLoop) -> Self {
        Self {
            session,
            dispatch,
            session_file: None,
        }
    }

    /// Persist bound identifiers to `path` after every submission.
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Wire the HTTP clients from configuration and bind any stored identifiers.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let api: Arc<dyn AssistantsApi> = Arc::new(OpenAIClient::from_config(config)?);
        let tools = ToolDispatcher::new(
            Arc::new(NewsApiClient::from_config(config)),
            Arc::new(TavilyClient::from_config(config)),
        );

        let explicit = SessionIds {
            assistant_id: config.assistant_id.clone(),
            thread_id: config.thread_id.clone(),
        };
        let ids = explicit.or(SessionIds::load(&config.session_file)?);

        let mut session = ConversationSession::new(api.clone(), config.model.clone());
        session.attach(&ids).await?;

        let dispatch = DispatchLoop::new(api, tools, config.poll_policy());
        Ok(Self::new(session, dispatch).with_session_file(config.session_file.clone()))
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn dispatch(&self) -> &DispatchLoop {
        &self.dispatch
    }

    /// Summarize `topic`: post it to the thread, run the assistant and wait for the reply.
    pub async fn summarize(&mut self, topic: &str) -> Result<Briefing> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(NewsdeskError::InvalidInput("topic must not be empty".to_string()));
        }

        self.session
            .ensure_assistant(ASSISTANT_NAME, ASSISTANT_INSTRUCTIONS, tool_definitions())
            .await?;
        self.session.ensure_thread().await?;
        self.persist_ids();

        self.session
            .append_message(MessageRole::User, &user_prompt(topic))
            .await?;
        let run = start_run(&self.session, RUN_INSTRUCTIONS).await?;

        let completed = self.dispatch.wait_for_completion(&run).await?;
        let steps = self
            .session
            .api()
            .list_run_steps(&run.thread_id, &run.id)
            .await?;
        info!(run_id = %run.id, steps = steps.len(), topic = %topic, "Briefing ready");

        Ok(Briefing {
            topic: topic.to_string(),
            run_id: completed.run_id,
            summary: completed.summary,
            steps,
        })
    }

    fn persist_ids(&self) {
        let Some(path) = self.session_file.as_deref() else {
            return;
        };
        if let Err(e) = self.session.ids().save(path) {
            warn!(path = %path.display(), error = %e, "Failed to save session identifiers");
        }
    }
}
