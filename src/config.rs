//! Configuration management for dockershrink
//!
//! Settings are loaded from environment variables with sensible defaults.
//! Command-line flags override them.
//!
//! # Environment Variables
//!
//! ## Dockershrink Configuration
//! - `DOCKERSHRINK_PROVIDER`: Provider selection (openai|ollama|anthropic|gemini|xai|groq) - default: "openai"
//! - `DOCKERSHRINK_MODEL`: Model name - default depends on the provider ("gpt-4o-2024-11-20" for OpenAI)
//! - `DOCKERSHRINK_REQUEST_TIMEOUT`: Timeout of a single LLM call in seconds - default: "120"
//! - `DOCKERSHRINK_MAX_LLM_CALLS`: Maximum LLM calls per optimization - default: "5"
//! - `DOCKERSHRINK_LOG_LEVEL`: Logging level - default: "info"
//! - `DOCKERSHRINK_API_BASE_URL`: Custom endpoint for the provider (optional)
//!
//! ## GenAI Provider Configuration
//! These environment variables are read directly by the genai library:
//! - **OpenAI**: `OPENAI_API_KEY` (required)
//! - **Anthropic**: `ANTHROPIC_API_KEY` (required)
//! - **Gemini**: `GEMINI_API_KEY` (required)
//! - **xAI**: `XAI_API_KEY` (required)
//! - **Groq**: `GROQ_API_KEY` (required)
//! - **Ollama**: no key, expects a local server
//!
//! # Example
//!
//! ```no_run
//! use dockershrink::DockershrinkConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DockershrinkConfig::default();
//! config.validate()?;
//!
//! let client = config.create_client().await?;
//! # Ok(())
//! # }
//! ```

use crate::llm::{BackendError, GenAIClient, LLMClient};
use crate::optimize::DEFAULT_MAX_LLM_CALLS;
use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;
const MAX_LLM_CALLS_LIMIT: usize = 50;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid provider name
    #[error("Invalid provider: {0}. Valid options: openai, ollama, anthropic, gemini, xai, groq")]
    InvalidProvider(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Client initialization failed
    #[error("LLM client initialization failed: {0}")]
    ClientInitError(#[from] BackendError),
}

/// Parses a provider name as accepted by `DOCKERSHRINK_PROVIDER` and `--backend`
pub fn parse_provider(name: &str) -> Result<AdapterKind, ConfigError> {
    match name.trim().to_lowercase().as_str() {
        "openai" => Ok(AdapterKind::OpenAI),
        "ollama" => Ok(AdapterKind::Ollama),
        "anthropic" | "claude" => Ok(AdapterKind::Anthropic),
        "gemini" => Ok(AdapterKind::Gemini),
        "xai" | "grok" => Ok(AdapterKind::Xai),
        "groq" => Ok(AdapterKind::Groq),
        _ => Err(ConfigError::InvalidProvider(name.to_string())),
    }
}

/// Model used when none is configured
pub fn default_model(provider: AdapterKind) -> &'static str {
    match provider {
        AdapterKind::Ollama => "qwen2.5-coder:7b",
        AdapterKind::Anthropic => "claude-3-5-sonnet-latest",
        AdapterKind::Gemini => "gemini-2.0-flash",
        AdapterKind::Xai => "grok-2-latest",
        AdapterKind::Groq => "llama-3.3-70b-versatile",
        _ => "gpt-4o-2024-11-20",
    }
}

/// Main configuration structure for dockershrink
///
/// `Default::default()` loads from environment variables, falling back to
/// defaults for anything missing or unparsable.
#[derive(Debug, Clone)]
pub struct DockershrinkConfig {
    /// LLM provider (from genai)
    pub provider: AdapterKind,

    /// Model name to use for inference (provider-specific)
    pub model: String,

    /// Timeout of a single LLM call in seconds
    pub request_timeout_secs: u64,

    /// Maximum number of LLM calls in one optimization
    pub max_llm_calls: usize,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for DockershrinkConfig {
    fn default() -> Self {
        let provider = env::var("DOCKERSHRINK_PROVIDER")
            .ok()
            .and_then(|s| parse_provider(&s).ok())
            .unwrap_or(AdapterKind::OpenAI);

        let model = env::var("DOCKERSHRINK_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_model(provider).to_string());

        let request_timeout_secs = env::var("DOCKERSHRINK_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let max_llm_calls = env::var("DOCKERSHRINK_MAX_LLM_CALLS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_LLM_CALLS);

        let log_level = env::var("DOCKERSHRINK_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            provider,
            model,
            request_timeout_secs,
            max_llm_calls,
            log_level,
        }
    }
}

impl DockershrinkConfig {
    /// Validates the configuration
    ///
    /// Provider-specific validation (API keys, endpoints) is handled by genai
    /// when the first request is sent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name must not be empty".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.max_llm_calls == 0 {
            return Err(ConfigError::ValidationFailed(
                "Maximum LLM calls must be at least 1".to_string(),
            ));
        }
        if self.max_llm_calls > MAX_LLM_CALLS_LIMIT {
            return Err(ConfigError::ValidationFailed(format!(
                "Maximum LLM calls cannot exceed {}",
                MAX_LLM_CALLS_LIMIT
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Creates an LLM client for the configured provider and model
    pub async fn create_client(&self) -> Result<Arc<dyn LLMClient>, ConfigError> {
        let timeout = Duration::from_secs(self.request_timeout_secs);
        let client = GenAIClient::new(self.provider, self.model.clone(), timeout).await?;
        Ok(Arc::new(client))
    }
}

impl fmt::Display for DockershrinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dockershrink Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Max LLM Calls: {}", self.max_llm_calls)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
