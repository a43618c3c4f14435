// src/llm/assistant/api.rs
// Assistants API surface used by the session, run controller and dispatch loop

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use super::types::*;
use crate::error::Result;
use crate::llm::client::OpenAIClient;

/// Largest page the run steps endpoint returns
const RUN_STEPS_PAGE_SIZE: u32 = 100;

/// Remote operations on assistants, threads, messages and runs.
///
/// The HTTP client implements this; tests drive the dispatch loop through
/// scripted implementations.
#[async_trait]
pub trait AssistantsApi: Send + Sync {
    async fn create_assistant(&self, request: &CreateAssistantRequest) -> Result<AssistantObject>;
    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<AssistantObject>;

    async fn create_thread(&self) -> Result<ThreadObject>;
    async fn retrieve_thread(&self, thread_id: &str) -> Result<ThreadObject>;

    async fn create_message(&self, thread_id: &str, request: &CreateMessageRequest) -> Result<MessageObject>;
    /// Newest message first
    async fn list_messages(&self, thread_id: &str, limit: u32) -> Result<Vec<MessageObject>>;

    async fn create_run(&self, thread_id: &str, request: &CreateRunRequest) -> Result<RunObject>;
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RunObject>;
    /// Ask the service to stop a run; it moves to `cancelling`, then `cancelled`.
    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<RunObject>;
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<RunObject>;
    async fn list_run_steps(&self, thread_id: &str, run_id: &str) -> Result<Vec<RunStep>>;
}

#[async_trait]
impl AssistantsApi for OpenAIClient {
    async fn create_assistant(&self, request: &CreateAssistantRequest) -> Result<AssistantObject> {
        self.send_json(self.request(Method::POST, "assistants").json(request)).await
    }

    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<AssistantObject> {
        self.send_json(self.request(Method::GET, &format!("assistants/{}", assistant_id)))
            .await
    }

    async fn create_thread(&self) -> Result<ThreadObject> {
        self.send_json(self.request(Method::POST, "threads").json(&json!({})))
            .await
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<ThreadObject> {
        self.send_json(self.request(Method::GET, &format!("threads/{}", thread_id)))
            .await
    }

    async fn create_message(&self, thread_id: &str, request: &CreateMessageRequest) -> Result<MessageObject> {
        self.send_json(
            self.request(Method::POST, &format!("threads/{}/messages", thread_id))
                .json(request),
        )
        .await
    }

    async fn list_messages(&self, thread_id: &str, limit: u32) -> Result<Vec<MessageObject>> {
        let limit = limit.to_string();
        let page: ListMessagesResponse = self
            .send_json(
                self.request(Method::GET, &format!("threads/{}/messages", thread_id))
                    .query(&[("order", "desc"), ("limit", limit.as_str())]),
            )
            .await?;
        Ok(page.data)
    }

    async fn create_run(&self, thread_id: &str, request: &CreateRunRequest) -> Result<RunObject> {
        self.send_json(
            self.request(Method::POST, &format!("threads/{}/runs", thread_id))
                .json(request),
        )
        .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RunObject> {
        self.send_json(self.request(Method::GET, &format!("threads/{}/runs/{}", thread_id, run_id)))
            .await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<RunObject> {
        self.send_json(self.request(
            Method::POST,
            &format!("threads/{}/runs/{}/cancel", thread_id, run_id),
        ))
        .await
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<RunObject> {
        let body = SubmitToolOutputsRequest { tool_outputs: outputs };
        self.send_json(
            self.request(
                Method::POST,
                &format!("threads/{}/runs/{}/submit_tool_outputs", thread_id, run_id),
            )
            .json(&body),
        )
        .await
    }

    async fn list_run_steps(&self, thread_id: &str, run_id: &str) -> Result<Vec<RunStep>> {
        let path = format!("threads/{}/runs/{}/steps", thread_id, run_id);
        let limit = RUN_STEPS_PAGE_SIZE.to_string();
        let mut steps = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut query = vec![("limit", limit.as_str())];
            if let Some(cursor) = after.as_deref() {
                query.push(("after", cursor));
            }
            let page: ListRunStepsResponse = self
                .send_json(self.request(Method::GET, &path).query(&query))
                .await?;

            let cursor = page.data.last().map(|step| step.id.clone());
            steps.extend(page.data);
            match cursor {
                Some(id) if page.has_more => after = Some(id),
                _ => break,
            }
        }
        Ok(steps)
    }
}
