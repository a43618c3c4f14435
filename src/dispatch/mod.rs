//! Drives one run to a terminal state, servicing tool calls along the way.
//!
//! Each cycle sleeps for the poll interval, retrieves the run and acts on its
//! status:
//!
//! - `queued` / `in_progress` / `cancelling` / unrecognised: poll again
//! - `requires_action`: answer every pending tool call and submit the batch
//! - `completed`: read the newest thread message as the summary
//! - `failed` / `cancelled` / `expired` / `incomplete`: stop with an error
//!
//! Giving up (attempt cap or cancellation) also asks the service to cancel the
//! run, since a thread with an active run rejects new messages.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{NewsdeskError, Result};
use crate::llm::assistant::types::{RunObject, RunStatus};
use crate::llm::assistant::manager::latest_message_text;
use crate::llm::assistant::{AssistantsApi, RunHandle};
use crate::tools::ToolDispatcher;

/// Default delay between polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How often and how long to poll a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until a terminal status
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

/// Result of a run that reached `completed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRun {
    pub run_id: String,
    pub thread_id: String,
    /// Text of the newest thread message
    pub summary: Option<String>,
    pub polls: u32,
    pub tool_batches: u32,
}

pub struct DispatchLoop {
    api: Arc<dyn AssistantsApi>,
    tools: ToolDispatcher,
    policy: PollPolicy,
    cancel: CancellationToken,
}

impl DispatchLoop {
    pub fn new(api: Arc<dyn AssistantsApi>, tools: ToolDispatcher, policy: PollPolicy) -> Self {
        Self {
            api,
            tools,
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Use `token` to abort polling from outside.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Poll `run` until it completes, answering tool calls as they arrive.
    pub async fn wait_for_completion(&self, run: &RunHandle) -> Result<CompletedRun> {
        let mut polls = 0u32;
        let mut tool_batches = 0u32;

        loop {
            if let Some(max) = self.policy.max_attempts {
                if polls >= max {
                    warn!(run_id = %run.id, attempts = polls, "Run did not finish in time");
                    return Err(self.abandon(run, NewsdeskError::PollTimeout { attempts: polls }).await);
                }
            }

            tokio::select! {
                _ = self.cancel.cancelled() => return Err(self.interrupted(run).await),
                _ = tokio::time::sleep(self.policy.interval) => {}
            }

            let current = tokio::select! {
                _ = self.cancel.cancelled() => return Err(self.interrupted(run).await),
                current = self.api.retrieve_run(&run.thread_id, &run.id) => current?,
            };
            polls += 1;
            debug!(run_id = %run.id, status = %current.status, poll = polls, "Run status");

            match current.status {
                RunStatus::Queued
                | RunStatus::InProgress
                | RunStatus::Cancelling
                | RunStatus::Unknown => continue,
                RunStatus::RequiresAction => {
                    tokio::select! {
                        _ = self.cancel.cancelled() => return Err(self.interrupted(run).await),
                        submitted = self.submit_required_outputs(&current) => submitted?,
                    }
                    tool_batches += 1;
                }
                RunStatus::Completed => {
                    let summary = latest_message_text(self.api.as_ref(), &run.thread_id).await?;
                    info!(run_id = %run.id, polls, tool_batches, "Run completed");
                    return Ok(CompletedRun {
                        run_id: run.id.clone(),
                        thread_id: run.thread_id.clone(),
                        summary,
                        polls,
                        tool_batches,
                    });
                }
                RunStatus::Cancelled
                | RunStatus::Failed
                | RunStatus::Incomplete
                | RunStatus::Expired => {
                    let message = current
                        .last_error
                        .as_ref()
                        .map(|e| format!("{}: {}", e.code, e.message))
                        .unwrap_or_else(|| "no error details".to_string());
                    warn!(run_id = %run.id, status = %current.status, %message, "Run ended without completing");
                    return Err(NewsdeskError::RunTerminated {
                        status: current.status.to_string(),
                        message,
                    });
                }
            }
        }
    }

    async fn interrupted(&self, run: &RunHandle) -> NewsdeskError {
        info!(run_id = %run.id, "Run polling cancelled");
        self.abandon(run, NewsdeskError::Cancelled).await
    }

    /// Cancel a run that is no longer being waited on, so its thread accepts
    /// new messages. Failure to cancel is logged and `reason` is returned as is.
    async fn abandon(&self, run: &RunHandle, reason: NewsdeskError) -> NewsdeskError {
        match self.api.cancel_run(&run.thread_id, &run.id).await {
            Ok(cancelled) => {
                info!(run_id = %run.id, status = %cancelled.status, "Requested run cancellation")
            }
            Err(e) => warn!(run_id = %run.id, error = %e, "Failed to cancel abandoned run"),
        }
        reason
    }

    /// Answer one `requires_action` batch and submit all outputs together.
    async fn submit_required_outputs(&self, run: &RunObject) -> Result<()> {
        let calls = run.pending_tool_calls();
        if calls.is_empty() {
            return Err(NewsdeskError::MalformedRun(format!(
                "run {} requires action but lists no tool calls",
                run.id
            )));
        }

        info!(run_id = %run.id, calls = calls.len(), "Function calling now");
        let outputs = self.tools.service_batch(calls).await;

        info!(run_id = %run.id, outputs = outputs.len(), "Submitting outputs back to the assistant");
        self.api
            .submit_tool_outputs(&run.thread_id, &run.id, &outputs)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(5));
        assert_eq!(policy.max_attempts, None);
    }
}
