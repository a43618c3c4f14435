// src/llm/assistant/manager.rs
// Conversation session: owns the assistant and thread identifiers

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::api::AssistantsApi;
use super::types::*;
use crate::error::{NewsdeskError, Result};

/// Identifiers persisted between process runs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl SessionIds {
    /// Read identifiers from `path`; a missing file yields empty identifiers.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Fill unset identifiers from `other` (explicit values win).
    pub fn or(self, other: SessionIds) -> SessionIds {
        SessionIds {
            assistant_id: self.assistant_id.or(other.assistant_id),
            thread_id: self.thread_id.or(other.thread_id),
        }
    }
}

/// Holds the bound assistant and thread. Once bound, an identifier is never reset.
pub struct ConversationSession {
    api: Arc<dyn AssistantsApi>,
    model: String,
    assistant: Option<AssistantObject>,
    thread: Option<ThreadObject>,
}

impl ConversationSession {
    pub fn new(api: Arc<dyn AssistantsApi>, model: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
            assistant: None,
            thread: None,
        }
    }

    /// Bind previously created identifiers by retrieving them from the service.
    pub async fn attach(&mut self, ids: &SessionIds) -> Result<()> {
        if let Some(assistant_id) = ids.assistant_id.as_deref() {
            let assistant = self.api.retrieve_assistant(assistant_id).await?;
            debug!(assistant_id = %assistant.id, "Retrieved existing assistant");
            self.assistant = Some(assistant);
        }
        if let Some(thread_id) = ids.thread_id.as_deref() {
            let thread = self.api.retrieve_thread(thread_id).await?;
            debug!(thread_id = %thread.id, "Retrieved existing thread");
            self.thread = Some(thread);
        }
        Ok(())
    }

    /// Create the assistant unless one is already bound.
    pub async fn ensure_assistant(
        &mut self,
        name: &str,
        instructions: &str,
        tools: Vec<AssistantTool>,
    ) -> Result<&str> {
        if self.assistant.is_none() {
            let request = CreateAssistantRequest {
                model: self.model.clone(),
                name: Some(name.to_string()),
                instructions: Some(instructions.to_string()),
                tools,
            };
            let assistant = self.api.create_assistant(&request).await?;
            info!(assistant_id = %assistant.id, "Created assistant");
            self.assistant = Some(assistant);
        }
        self.assistant_id()
            .ok_or(NewsdeskError::SessionNotReady("no assistant bound"))
    }

    /// Create the conversation thread unless one is already bound.
    pub async fn ensure_thread(&mut self) -> Result<&str> {
        if self.thread.is_none() {
            let thread = self.api.create_thread().await?;
            info!(thread_id = %thread.id, "Created thread");
            self.thread = Some(thread);
        }
        self.thread_id()
            .ok_or(NewsdeskError::SessionNotReady("no thread bound"))
    }

    /// Append a message to the bound thread.
    pub async fn append_message(&self, role: MessageRole, content: &str) -> Result<MessageObject> {
        let thread_id = self
            .thread_id()
            .ok_or(NewsdeskError::SessionNotReady("no thread bound"))?;
        let request = CreateMessageRequest {
            role,
            content: content.to_string(),
        };
        self.api.create_message(thread_id, &request).await
    }

    /// Text of the newest message in the thread.
    pub async fn latest_message_text(&self) -> Result<Option<String>> {
        let thread_id = self
            .thread_id()
            .ok_or(NewsdeskError::SessionNotReady("no thread bound"))?;
        latest_message_text(self.api.as_ref(), thread_id).await
    }

    pub fn assistant_id(&self) -> Option<&str> {
        self.assistant.as_ref().map(|a| a.id.as_str())
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread.as_ref().map(|t| t.id.as_str())
    }

    pub fn api(&self) -> &Arc<dyn AssistantsApi> {
        &self.api
    }

    /// Snapshot of bound identifiers for persistence
    pub fn ids(&self) -> SessionIds {
        SessionIds {
            assistant_id: self.assistant_id().map(str::to_string),
            thread_id: self.thread_id().map(str::to_string),
        }
    }
}

/// Text of the newest message in `thread_id`, if it has a text block.
pub async fn latest_message_text(api: &dyn AssistantsApi, thread_id: &str) -> Result<Option<String>> {
    let messages = api.list_messages(thread_id, 1).await?;
    Ok(messages.first().and_then(|m| m.text()).map(str::to_string))
}
