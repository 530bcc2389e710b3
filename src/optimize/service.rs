//! Optimization service orchestration
//!
//! `OptimizeService` drives a bounded conversation with an LLM:
//! 1. Builds the system instructions and user query from the request
//! 2. Calls the model with the `read_files` tool and a strict response format
//! 3. Answers every `read_files` call with the requested file contents
//! 4. Decodes the first response without tool calls as the final answer
//!
//! The number of model calls per run is capped (5 by default). A run that
//! reaches the cap without a final answer fails.
//!
//! # Example
//!
//! ```no_run
//! use dockershrink::optimize::{OptimizeRequest, OptimizeService};
//! use dockershrink::project::LocalProjectDirectory;
//! use dockershrink::DockershrinkConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DockershrinkConfig::default();
//! let client = config.create_client().await?;
//! let service = OptimizeService::new(client).with_max_llm_calls(config.max_llm_calls);
//!
//! let project = Arc::new(LocalProjectDirectory::new("/path/to/project")?);
//! let dockerfile = std::fs::read_to_string("/path/to/project/Dockerfile")?;
//! let package_json = std::fs::read_to_string("/path/to/project/package.json")?;
//!
//! let request = OptimizeRequest::from_dockerfile(dockerfile, package_json, project);
//! let response = service.optimize(request).await?;
//!
//! println!("{}", response.dockerfile);
//! # Ok(())
//! # }
//! ```

use super::conversation::Conversation;
use super::error::OptimizeError;
use super::prompt;
use super::request::OptimizeRequest;
use super::response::{decode_response, response_format, OptimizeResponse};
use super::tools::{tool_definitions, ToolExecutor};
use crate::llm::{LLMClient, LLMRequest, LLMResponse};
use crate::prompt::{PlaceholderRenderer, TemplateRenderer};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

pub const DEFAULT_MAX_LLM_CALLS: usize = 5;

/// Phase of an optimization run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingModel,
    ProcessingTools,
    Done,
    Failed,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoopState::AwaitingModel => "awaiting_model",
            LoopState::ProcessingTools => "processing_tools",
            LoopState::Done => "done",
            LoopState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Optimizes Dockerfiles through a tool-calling conversation with an LLM
pub struct OptimizeService {
    client: Arc<dyn LLMClient>,
    renderer: Arc<dyn TemplateRenderer>,
    max_llm_calls: usize,
    temperature: Option<f32>,
}

impl OptimizeService {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            renderer: Arc::new(PlaceholderRenderer::new()),
            max_llm_calls: DEFAULT_MAX_LLM_CALLS,
            temperature: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Upper bound on model calls in a single run
    pub fn with_max_llm_calls(mut self, max_llm_calls: usize) -> Self {
        self.max_llm_calls = max_llm_calls;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_llm_calls(&self) -> usize {
        self.max_llm_calls
    }

    pub fn backend_name(&self) -> &str {
        self.client.name()
    }

    pub fn backend_model_info(&self) -> Option<String> {
        self.client.model_info()
    }

    pub async fn optimize(
        &self,
        request: OptimizeRequest,
    ) -> Result<OptimizeResponse, OptimizeError> {
        self.optimize_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Same as [`optimize`](Self::optimize), aborting with
    /// [`OptimizeError::Cancelled`] once `cancel` fires.
    pub async fn optimize_with_cancel(
        &self,
        request: OptimizeRequest,
        cancel: CancellationToken,
    ) -> Result<OptimizeResponse, OptimizeError> {
        let start = Instant::now();
        info!(
            backend = self.client.name(),
            stage_count = request.stage_count,
            max_llm_calls = self.max_llm_calls,
            "Starting Dockerfile optimization"
        );

        match self.run(&request, &cancel).await {
            Ok(response) => {
                info!(
                    state = %LoopState::Done,
                    actions = response.actions_taken.len(),
                    recommendations = response.recommendations.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Optimization completed"
                );
                Ok(response)
            }
            Err(e) => {
                error!(
                    state = %LoopState::Failed,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Optimization failed: {}",
                    e
                );
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        request: &OptimizeRequest,
        cancel: &CancellationToken,
    ) -> Result<OptimizeResponse, OptimizeError> {
        let (system, user) = prompt::assemble(self.renderer.as_ref(), request)?;
        debug!(system = %system, user = %user, "Constructed prompts");

        let mut conversation = Conversation::new(system, user);
        let executor = ToolExecutor::new(request.project.as_ref(), self.renderer.as_ref());
        let mut state = LoopState::AwaitingModel;

        for call_number in 1..=self.max_llm_calls {
            debug!(call_number, %state, messages = conversation.len(), "Calling LLM");

            let response = self.call_model(&conversation, cancel).await?;

            if !response.has_tool_calls() {
                state = LoopState::Done;
                debug!(call_number, %state, content = %response.content, "Received final answer");
                return decode_response(&response.content);
            }

            state = LoopState::ProcessingTools;
            debug!(
                call_number,
                %state,
                tool_calls = response.tool_calls.len(),
                "LLM requested tools"
            );

            conversation.push(response.to_assistant_message());
            for tool_call in &response.tool_calls {
                if cancel.is_cancelled() {
                    return Err(OptimizeError::Cancelled);
                }
                if let Some(result) = executor.execute(tool_call)? {
                    conversation.push(result);
                }
            }

            state = LoopState::AwaitingModel;
        }

        Err(OptimizeError::BudgetExhausted {
            max_calls: self.max_llm_calls,
        })
    }

    async fn call_model(
        &self,
        conversation: &Conversation,
        cancel: &CancellationToken,
    ) -> Result<LLMResponse, OptimizeError> {
        let mut llm_request = LLMRequest::new(conversation.messages().to_vec())
            .with_tools(tool_definitions())
            .with_response_format(response_format());
        if let Some(temperature) = self.temperature {
            llm_request = llm_request.with_temperature(temperature);
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(OptimizeError::Cancelled),
            result = self.client.chat(llm_request) => result?,
        };

        debug!(
            response_time_ms = response.response_time.as_millis() as u64,
            tool_calls = response.tool_calls.len(),
            "LLM responded"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{BackendError, MessageRole, MockLLMClient, MockResponse};
    use crate::project::MockProjectDirectory;
    use serde_json::json;

    const FINAL_ANSWER: &str =
        r#"{"dockerfile":"FROM node:20-alpine\n","actionsTaken":["Switched to alpine"],"recommendations":[]}"#;

    fn request(project: Arc<MockProjectDirectory>) -> OptimizeRequest {
        OptimizeRequest::from_dockerfile("FROM node:20\n", r#"{"name":"app"}"#, project)
    }

    #[test]
    fn test_loop_state_display() {
        assert_eq!(LoopState::AwaitingModel.to_string(), "awaiting_model");
        assert_eq!(LoopState::Failed.to_string(), "failed");
    }

    #[tokio::test]
    async fn test_final_answer_on_first_call() {
        let client = Arc::new(MockLLMClient::new());
        client.add_response(MockResponse::text(FINAL_ANSWER));
        let service = OptimizeService::new(client.clone());

        let response = service
            .optimize(request(Arc::new(MockProjectDirectory::new())))
            .await
            .unwrap();

        assert_eq!(response.dockerfile, "FROM node:20-alpine\n");
        assert_eq!(client.call_count(), 1);

        let sent = &client.requests()[0];
        assert_eq!(sent.messages.len(), 2);
        assert_eq!(sent.tools.len(), 1);
        assert_eq!(sent.tools[0].name, "read_files");
        assert!(sent.response_format.as_ref().unwrap().strict);
        assert!(sent.temperature.is_none());
    }

    #[tokio::test]
    async fn test_temperature_is_forwarded() {
        let client = Arc::new(MockLLMClient::new());
        client.add_response(MockResponse::text(FINAL_ANSWER));
        let service = OptimizeService::new(client.clone()).with_temperature(0.1);

        service
            .optimize(request(Arc::new(MockProjectDirectory::new())))
            .await
            .unwrap();

        assert_eq!(client.requests()[0].temperature, Some(0.1));
    }

    #[tokio::test]
    async fn test_tool_result_appended_before_next_call() {
        let project = Arc::new(MockProjectDirectory::new());
        project.add_file("index.js", "require('express')");

        let client = Arc::new(MockLLMClient::new());
        client.add_responses([
            MockResponse::with_tool_calls(
                "",
                vec![MockLLMClient::read_files_call("call_1", ["index.js"])],
            ),
            MockResponse::text(FINAL_ANSWER),
        ]);
        let service = OptimizeService::new(client.clone());

        service.optimize(request(project)).await.unwrap();

        let second = &client.requests()[1];
        let roles: Vec<MessageRole> = second.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::Tool
            ]
        );
        assert!(second.messages[3].content.contains("require('express')"));
    }

    #[tokio::test]
    async fn test_zero_budget_never_calls_model() {
        let client = Arc::new(MockLLMClient::new());
        let service = OptimizeService::new(client.clone()).with_max_llm_calls(0);

        let err = service
            .optimize(request(Arc::new(MockProjectDirectory::new())))
            .await
            .unwrap_err();

        assert!(matches!(err, OptimizeError::BudgetExhausted { max_calls: 0 }));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_error_is_surfaced() {
        let client = Arc::new(MockLLMClient::new());
        client.add_response(MockResponse::error(BackendError::NetworkError {
            message: "connection refused".to_string(),
        }));
        let service = OptimizeService::new(client.clone());

        let err = service
            .optimize(request(Arc::new(MockProjectDirectory::new())))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OptimizeError::Transport(BackendError::NetworkError { .. })
        ));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_call() {
        let client = Arc::new(MockLLMClient::new());
        client.add_response(MockResponse::text(FINAL_ANSWER));
        let service = OptimizeService::new(client.clone());

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service
            .optimize_with_cancel(request(Arc::new(MockProjectDirectory::new())), cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, OptimizeError::Cancelled));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool_only_batch_continues() {
        let client = Arc::new(MockLLMClient::new());
        client.add_responses([
            MockResponse::with_tool_calls(
                "",
                vec![MockLLMClient::tool_call("call_1", "list_dir", json!({}))],
            ),
            MockResponse::text(FINAL_ANSWER),
        ]);
        let service = OptimizeService::new(client.clone());

        service
            .optimize(request(Arc::new(MockProjectDirectory::new())))
            .await
            .unwrap();

        // system, user, assistant; no tool result for the unknown call
        assert_eq!(client.requests()[1].messages.len(), 3);
    }
}
