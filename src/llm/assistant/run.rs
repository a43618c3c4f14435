// src/llm/assistant/run.rs
// Starting runs against the session's thread

use tracing::info;

use super::manager::ConversationSession;
use super::types::{CreateRunRequest, RunStatus};
use crate::error::{NewsdeskError, Result};

/// Handle to a started run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunHandle {
    pub id: String,
    pub thread_id: String,
    pub assistant_id: String,
    pub status: RunStatus,
}

/// Start one run of the bound assistant on the bound thread.
pub async fn start_run(session: &ConversationSession, instructions: &str) -> Result<RunHandle> {
    let assistant_id = session
        .assistant_id()
        .ok_or(NewsdeskError::SessionNotReady("no assistant bound"))?;
    let thread_id = session
        .thread_id()
        .ok_or(NewsdeskError::SessionNotReady("no thread bound"))?;

    let request = CreateRunRequest {
        assistant_id: assistant_id.to_string(),
        instructions: Some(instructions.to_string()),
    };
    let run = session.api().create_run(thread_id, &request).await?;
    info!(run_id = %run.id, thread_id = %run.thread_id, status = %run.status, "Started run");

    Ok(RunHandle {
        id: run.id,
        thread_id: run.thread_id,
        assistant_id: assistant_id.to_string(),
        status: run.status,
    })
}
