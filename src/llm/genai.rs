//! GenAI-based LLM client implementation
//!
//! This module provides an LLM client implementation using the `genai` crate,
//! supporting multiple providers (OpenAI, Ollama, Anthropic, Gemini, xAI, Groq).
//! Structured output is requested through `ChatResponseFormat::JsonSpec`.

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{
    ChatMessage, LLMRequest, LLMResponse, MessageRole, ResponseFormat, ToolCall, ToolDefinition,
};
use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{
    ChatMessage as GenAIChatMessage, ChatOptions, ChatRequest as GenAIChatRequest,
    ChatResponseFormat, ContentPart, JsonSpec, MessageContent, Tool as GenAITool, ToolResponse,
};
use genai::resolver::{AuthData, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use std::time::Duration;
use tracing::{debug, error};

/// Environment variable overriding the provider endpoint
pub const API_BASE_URL_ENV: &str = "DOCKERSHRINK_API_BASE_URL";

/// GenAI-based LLM client supporting multiple providers
pub struct GenAIClient {
    client: Client,
    model: String,
    provider: AdapterKind,
    /// Per-call timeout
    timeout: Duration,
}

impl GenAIClient {
    /// Creates a new GenAI client
    ///
    /// # Arguments
    ///
    /// * `provider` - LLM provider to use
    /// * `model` - Model name (without provider prefix)
    /// * `timeout` - Timeout applied to every single chat call
    pub async fn new(
        provider: AdapterKind,
        model: String,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        if model.trim().is_empty() {
            return Err(BackendError::ConfigurationError {
                message: "Model name must not be empty".to_string(),
            });
        }

        let custom_endpoint = std::env::var(API_BASE_URL_ENV).ok();

        let client = if let Some(endpoint_url) = custom_endpoint {
            debug!(
                "Using custom endpoint for {}: {}",
                provider.as_str(),
                endpoint_url
            );

            let model_clone = model.clone();

            let resolver = ServiceTargetResolver::from_resolver_fn(
                move |_service_target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error>
                {
                    let endpoint = Endpoint::from_owned(endpoint_url.clone());

                    let auth = match provider.default_key_env_name() {
                        Some(api_key_var) => AuthData::from_env(api_key_var),
                        None => AuthData::from_single(""),
                    };

                    Ok(ServiceTarget {
                        endpoint,
                        auth,
                        model: ModelIden::new(provider, &model_clone),
                    })
                },
            );

            Client::builder()
                .with_service_target_resolver(resolver)
                .build()
        } else {
            Client::default()
        };

        debug!(
            "Creating GenAI client: provider={}, model={}",
            provider.as_str(),
            model,
        );

        Ok(Self {
            client,
            model,
            provider,
            timeout,
        })
    }

    fn convert_message(&self, msg: &ChatMessage) -> GenAIChatMessage {
        match msg.role {
            MessageRole::System => GenAIChatMessage::system(&msg.content),
            MessageRole::User => GenAIChatMessage::user(&msg.content),
            MessageRole::Assistant => match msg.tool_calls {
                Some(ref tool_calls) => {
                    // text the model sent alongside its tool calls goes back verbatim
                    let mut parts = Vec::with_capacity(tool_calls.len() + 1);
                    if !msg.content.is_empty() {
                        parts.push(ContentPart::Text(msg.content.clone()));
                    }
                    parts.extend(tool_calls.iter().map(|tc| {
                        ContentPart::ToolCall(genai::chat::ToolCall {
                            call_id: tc.call_id.clone(),
                            fn_name: tc.name.clone(),
                            fn_arguments: tc.arguments.clone(),
                        })
                    }));
                    GenAIChatMessage::assistant(MessageContent::from_parts(parts))
                }
                None => GenAIChatMessage::assistant(&msg.content),
            },
            MessageRole::Tool => ToolResponse::new(
                msg.tool_call_id.clone().unwrap_or_default(),
                msg.content.clone(),
            )
            .into(),
        }
    }

    fn convert_tool(&self, tool: &ToolDefinition) -> GenAITool {
        GenAITool::new(&tool.name)
            .with_description(&tool.description)
            .with_schema(tool.parameters.clone())
    }

    fn convert_response_format(&self, format: &ResponseFormat) -> ChatResponseFormat {
        // genai always marks JsonSpec schemas as strict for providers that support it
        if !format.strict {
            debug!(name = %format.name, "Non-strict response format requested, sending as strict");
        }
        ChatResponseFormat::JsonSpec(
            JsonSpec::new(&format.name, format.schema.clone()).with_description(&format.description),
        )
    }
}

#[async_trait]
impl LLMClient for GenAIClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        let start = std::time::Instant::now();

        let messages: Vec<GenAIChatMessage> = request
            .messages
            .iter()
            .map(|m| self.convert_message(m))
            .collect();

        let tools: Vec<GenAITool> = request.tools.iter().map(|t| self.convert_tool(t)).collect();

        let genai_request = GenAIChatRequest::new(messages).with_tools(tools);

        let mut options = ChatOptions::default();
        if let Some(temp) = request.temperature {
            options = options.with_temperature(temp as f64);
        }
        if let Some(max_tokens) = request.max_tokens {
            options = options.with_max_tokens(max_tokens);
        }
        if let Some(ref format) = request.response_format {
            options = options.with_response_format(self.convert_response_format(format));
        }

        let response = match tokio::time::timeout(
            self.timeout,
            self.client
                .exec_chat(&self.model, genai_request, Some(&options)),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                error!("{} API error: {}", self.provider.as_str(), e);
                return Err(BackendError::ApiError {
                    message: format!("{} request failed: {}", self.provider.as_str(), e),
                    status_code: None,
                });
            }
            Err(_) => {
                error!(
                    "{} request timed out after {}s",
                    self.provider.as_str(),
                    self.timeout.as_secs()
                );
                return Err(BackendError::TimeoutError {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let content = response.first_text().unwrap_or_default().to_string();

        let tool_calls: Vec<ToolCall> = response
            .tool_calls()
            .into_iter()
            .map(|tc| ToolCall {
                call_id: tc.call_id.clone(),
                name: tc.fn_name.clone(),
                arguments: tc.fn_arguments.clone(),
            })
            .collect();

        Ok(LLMResponse::with_tool_calls(
            content,
            tool_calls,
            start.elapsed(),
        ))
    }

    fn name(&self) -> &str {
        self.provider.as_str()
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

impl std::fmt::Debug for GenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAIClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_genai_client_creation() {
        let client = GenAIClient::new(
            AdapterKind::OpenAI,
            "gpt-4o-2024-11-20".to_string(),
            Duration::from_secs(30),
        )
        .await
        .unwrap();

        assert_eq!(client.name(), "OpenAI");
        assert_eq!(client.model_info(), Some("gpt-4o-2024-11-20".to_string()));
    }

    #[tokio::test]
    async fn test_empty_model_rejected() {
        let result =
            GenAIClient::new(AdapterKind::OpenAI, "  ".to_string(), Duration::from_secs(30)).await;
        assert!(matches!(
            result,
            Err(BackendError::ConfigurationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_assistant_tool_turn_keeps_text() {
        let client = GenAIClient::new(
            AdapterKind::OpenAI,
            "gpt-4o-2024-11-20".to_string(),
            Duration::from_secs(30),
        )
        .await
        .unwrap();
        let call = ToolCall {
            call_id: "call_1".to_string(),
            name: "read_files".to_string(),
            arguments: serde_json::json!({"filepaths": ["server.js"]}),
        };

        let msg = ChatMessage::assistant_with_tools("Let me look at the entrypoint", vec![call.clone()]);
        let converted = client.convert_message(&msg);
        assert_eq!(converted.content.texts(), vec!["Let me look at the entrypoint"]);
        let calls = converted.content.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].call_id, "call_1");
        assert_eq!(calls[0].fn_arguments["filepaths"][0], "server.js");

        let silent = client.convert_message(&ChatMessage::assistant_with_tools("", vec![call]));
        assert!(silent.content.texts().is_empty());
        assert_eq!(silent.content.tool_calls().len(), 1);
    }

    #[test]
    fn test_debug_impl() {
        fn assert_debug<T: std::fmt::Debug>() {}
        assert_debug::<GenAIClient>();
    }
}
