//! Shared fakes for integration tests: a scripted assistant service and
//! recording lookup providers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use newsdesk::dispatch::{DispatchLoop, PollPolicy};
use newsdesk::error::{NewsdeskError, Result};
use newsdesk::llm::assistant::types::*;
use newsdesk::llm::assistant::{AssistantsApi, ConversationSession};
use newsdesk::tools::{NewsProvider, SearchDepth, ToolDispatcher, WebSearchProvider};

/// What the next `retrieve_run` returns
#[derive(Debug, Clone)]
pub enum Step {
    Status(RunStatus),
    RequiresAction(Vec<ToolCall>),
    /// Completes the run and appends this assistant reply to the thread
    Complete(String),
    Fail { status: RunStatus, code: String, message: String },
}

#[derive(Default)]
pub struct FakeState {
    pub assistants_created: u32,
    pub threads_created: u32,
    pub assistants_retrieved: Vec<String>,
    pub threads_retrieved: Vec<String>,
    pub last_assistant_request: Option<CreateAssistantRequest>,
    pub messages: Vec<(MessageRole, String)>,
    pub runs_created: Vec<CreateRunRequest>,
    pub script: VecDeque<Step>,
    pub polls: u32,
    pub pending: Vec<ToolCall>,
    pub submitted: Vec<Vec<ToolOutput>>,
    pub cancelled: Vec<String>,
}

/// In-memory assistant service driven by a script of run states.
#[derive(Default)]
pub struct ScriptedAssistants {
    pub state: Mutex<FakeState>,
}

impl ScriptedAssistants {
    pub fn new(script: Vec<Step>) -> Arc<Self> {
        let fake = Self::default();
        fake.state.lock().unwrap().script = script.into();
        Arc::new(fake)
    }

    pub fn submitted(&self) -> Vec<Vec<ToolOutput>> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.state.lock().unwrap().cancelled.clone()
    }

    pub fn messages(&self) -> Vec<(MessageRole, String)> {
        self.state.lock().unwrap().messages.clone()
    }

    fn run(&self, status: RunStatus) -> RunObject {
        RunObject {
            id: "run_1".to_string(),
            thread_id: "thread_1".to_string(),
            assistant_id: Some("asst_1".to_string()),
            status,
            required_action: None,
            last_error: None,
        }
    }
}

fn message(index: usize, role: MessageRole, text: &str) -> MessageObject {
    MessageObject {
        id: format!("msg_{}", index),
        role,
        content: vec![MessageContent {
            content_type: "text".to_string(),
            text: Some(TextContent {
                value: text.to_string(),
                annotations: Vec::new(),
            }),
        }],
    }
}

#[async_trait]
impl AssistantsApi for ScriptedAssistants {
    async fn create_assistant(&self, request: &CreateAssistantRequest) -> Result<AssistantObject> {
        let mut state = self.state.lock().unwrap();
        state.assistants_created += 1;
        state.last_assistant_request = Some(request.clone());
        Ok(AssistantObject {
            id: format!("asst_{}", state.assistants_created),
            name: request.name.clone(),
            model: Some(request.model.clone()),
        })
    }

    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<AssistantObject> {
        self.state
            .lock()
            .unwrap()
            .assistants_retrieved
            .push(assistant_id.to_string());
        Ok(AssistantObject {
            id: assistant_id.to_string(),
            name: None,
            model: None,
        })
    }

    async fn create_thread(&self) -> Result<ThreadObject> {
        let mut state = self.state.lock().unwrap();
        state.threads_created += 1;
        Ok(ThreadObject {
            id: format!("thread_{}", state.threads_created),
        })
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<ThreadObject> {
        self.state
            .lock()
            .unwrap()
            .threads_retrieved
            .push(thread_id.to_string());
        Ok(ThreadObject {
            id: thread_id.to_string(),
        })
    }

    async fn create_message(&self, _thread_id: &str, request: &CreateMessageRequest) -> Result<MessageObject> {
        let mut state = self.state.lock().unwrap();
        state.messages.push((request.role, request.content.clone()));
        Ok(message(state.messages.len(), request.role, &request.content))
    }

    async fn list_messages(&self, _thread_id: &str, limit: u32) -> Result<Vec<MessageObject>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .messages
            .iter()
            .enumerate()
            .rev()
            .take(limit as usize)
            .map(|(i, (role, text))| message(i + 1, *role, text))
            .collect())
    }

    async fn create_run(&self, _thread_id: &str, request: &CreateRunRequest) -> Result<RunObject> {
        self.state.lock().unwrap().runs_created.push(request.clone());
        Ok(self.run(RunStatus::Queued))
    }

    async fn retrieve_run(&self, _thread_id: &str, _run_id: &str) -> Result<RunObject> {
        let mut state = self.state.lock().unwrap();
        state.polls += 1;
        let step = state
            .script
            .pop_front()
            .unwrap_or(Step::Status(RunStatus::InProgress));

        let run = match step {
            Step::Status(status) => self.run(status),
            Step::RequiresAction(calls) => {
                state.pending = calls.clone();
                RunObject {
                    required_action: Some(RequiredAction {
                        action_type: "submit_tool_outputs".to_string(),
                        submit_tool_outputs: SubmitToolOutputs { tool_calls: calls },
                    }),
                    ..self.run(RunStatus::RequiresAction)
                }
            }
            Step::Complete(reply) => {
                state.messages.push((MessageRole::Assistant, reply));
                self.run(RunStatus::Completed)
            }
            Step::Fail { status, code, message } => RunObject {
                last_error: Some(RunError { code, message }),
                ..self.run(status)
            },
        };
        Ok(run)
    }

    async fn cancel_run(&self, _thread_id: &str, run_id: &str) -> Result<RunObject> {
        self.state.lock().unwrap().cancelled.push(run_id.to_string());
        Ok(self.run(RunStatus::Cancelling))
    }

    async fn submit_tool_outputs(
        &self,
        _thread_id: &str,
        _run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<RunObject> {
        let mut state = self.state.lock().unwrap();
        let mut expected: Vec<&str> = state.pending.iter().map(|c| c.id.as_str()).collect();
        let mut got: Vec<&str> = outputs.iter().map(|o| o.tool_call_id.as_str()).collect();
        expected.sort_unstable();
        got.sort_unstable();
        if expected != got {
            return Err(NewsdeskError::Api {
                status: 400,
                message: format!("expected outputs for {:?}, got {:?}", expected, got),
            });
        }
        state.pending.clear();
        state.submitted.push(outputs.to_vec());
        Ok(self.run(RunStatus::Queued))
    }

    async fn list_run_steps(&self, _thread_id: &str, _run_id: &str) -> Result<Vec<RunStep>> {
        let state = self.state.lock().unwrap();
        let mut steps: Vec<RunStep> = state
            .submitted
            .iter()
            .enumerate()
            .map(|(i, _)| RunStep {
                id: format!("step_{}", i + 1),
                step_type: "tool_calls".to_string(),
                status: "completed".to_string(),
                created_at: 1_700_000_000 + i as i64,
                step_details: serde_json::json!({ "type": "tool_calls" }),
            })
            .collect();
        steps.push(RunStep {
            id: format!("step_{}", steps.len() + 1),
            step_type: "message_creation".to_string(),
            status: "completed".to_string(),
            created_at: 1_700_000_100,
            step_details: serde_json::json!({ "type": "message_creation" }),
        });
        Ok(steps)
    }
}

/// News provider returning numbered article blocks and recording topics
pub struct RecordingNews {
    pub count: usize,
    pub topics: Mutex<Vec<String>>,
}

impl RecordingNews {
    pub fn new(count: usize) -> Arc<Self> {
        Arc::new(Self {
            count,
            topics: Mutex::new(Vec::new()),
        })
    }

    pub fn article(topic: &str, n: usize) -> String {
        format!("\nTitle: {} story {}\nAuthor: Desk\nSource: Wire\nDescription: d{}\nURL: https://news.test/{}\n", topic, n, n, n)
    }
}

#[async_trait]
impl NewsProvider for RecordingNews {
    async fn get_news(&self, topic: &str) -> anyhow::Result<Vec<String>> {
        self.topics.lock().unwrap().push(topic.to_string());
        Ok((1..=self.count).map(|n| Self::article(topic, n)).collect())
    }
}

/// Web search provider returning a fixed line and recording queries
#[derive(Default)]
pub struct RecordingSearch {
    pub queries: Mutex<Vec<(String, SearchDepth)>>,
}

#[async_trait]
impl WebSearchProvider for RecordingSearch {
    async fn search(&self, query: &str, depth: SearchDepth) -> anyhow::Result<String> {
        self.queries.lock().unwrap().push((query.to_string(), depth));
        Ok(format!("Search Results:\n\nResult 1:\nTitle: {}\nContent: found\n\n", query))
    }
}

/// Provider that fails every call
pub struct BrokenProvider;

#[async_trait]
impl NewsProvider for BrokenProvider {
    async fn get_news(&self, _topic: &str) -> anyhow::Result<Vec<String>> {
        anyhow::bail!("news backend exploded")
    }
}

#[async_trait]
impl WebSearchProvider for BrokenProvider {
    async fn search(&self, _query: &str, _depth: SearchDepth) -> anyhow::Result<String> {
        anyhow::bail!("search backend exploded")
    }
}

pub fn fast_policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(1),
        max_attempts: Some(50),
    }
}

pub fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        call_type: "function".to_string(),
        function: FunctionCall {
            name: name.to_string(),
            arguments: arguments.to_string(),
        },
    }
}

pub fn dispatch_loop(
    api: Arc<ScriptedAssistants>,
    news: Arc<dyn NewsProvider>,
    search: Arc<dyn WebSearchProvider>,
) -> DispatchLoop {
    DispatchLoop::new(api, ToolDispatcher::new(news, search), fast_policy())
}

/// Session with assistant and thread already created
pub async fn ready_session(api: Arc<ScriptedAssistants>) -> ConversationSession {
    let mut session = ConversationSession::new(api, "gpt-4o-mini");
    session
        .ensure_assistant("Test", "Be brief", Vec::new())
        .await
        .unwrap();
    session.ensure_thread().await.unwrap();
    session
}
