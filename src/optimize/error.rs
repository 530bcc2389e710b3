use crate::llm::BackendError;
use crate::project::ProjectError;
use crate::prompt::TemplateError;
use thiserror::Error;

/// Errors that end an optimization run. None of them are retried.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("failed to construct prompt: {0}")]
    Template(#[from] TemplateError),

    #[error("failed to get chat completion: {0}")]
    Transport(#[from] BackendError),

    #[error("failed to parse {tool} arguments ({arguments}) from LLM: {source}")]
    ArgumentDecode {
        tool: String,
        arguments: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read files from the project requested by LLM: {0}")]
    FileAccess(#[from] ProjectError),

    #[error("failed to parse final response from LLM: {source}")]
    Decode {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("maximum number of LLM calls reached ({max_calls}) without a final answer")]
    BudgetExhausted { max_calls: usize },

    #[error("optimization cancelled")]
    Cancelled,
}

impl OptimizeError {
    /// Returns a user-friendly error message with troubleshooting hints
    pub fn help_message(&self) -> String {
        match self {
            OptimizeError::Template(err) => format!(
                "Error: Failed to build the prompt\n\n\
                Help: A prompt template could not be filled. This is a bug in dockershrink,\n\
                please report it.\n\n\
                Details: {}",
                err
            ),
            OptimizeError::Transport(BackendError::TimeoutError { seconds }) => format!(
                "Error: Request timeout after {} seconds\n\n\
                Help: The LLM request took too long. Try:\n\
                - Increase timeout: --timeout {}\n\
                - Check network connectivity",
                seconds,
                seconds * 2
            ),
            OptimizeError::Transport(BackendError::AuthenticationError { message }) => format!(
                "Error: Authentication failed\n\n\
                Help: Invalid or missing credentials. Try:\n\
                - Check the API key of your provider (e.g. OPENAI_API_KEY)\n\
                - Verify the key has not expired\n\n\
                Details: {}",
                message
            ),
            OptimizeError::Transport(err) => format!(
                "Error: LLM request failed\n\n\
                Help: Try:\n\
                - Check network connectivity\n\
                - Check the provider and model: --backend, --model\n\
                - Retry the operation\n\n\
                Details: {}",
                err
            ),
            OptimizeError::ArgumentDecode { tool, arguments, .. } => format!(
                "Error: The LLM called {} with malformed arguments\n\n\
                Help: Retry the operation or try a different model.\n\n\
                Arguments: {}",
                tool, arguments
            ),
            OptimizeError::FileAccess(err) => format!(
                "Error: Failed to read a file requested by the LLM\n\n\
                Help: Check that the project directory is correct and readable.\n\n\
                Details: {}",
                err
            ),
            OptimizeError::Decode { raw, source } => format!(
                "Error: Failed to parse the optimization result\n\n\
                Help: The LLM returned a response that is not the expected JSON. Try:\n\
                - Retry the operation\n\
                - Try a different model\n\n\
                Details: {}\nResponse: {}",
                source,
                raw.chars().take(500).collect::<String>()
            ),
            OptimizeError::BudgetExhausted { max_calls } => format!(
                "Error: No final answer after {} LLM calls\n\n\
                Help: The LLM kept requesting files. Try:\n\
                - Raise the limit: --max-llm-calls {}\n\
                - Retry the operation",
                max_calls,
                max_calls * 2
            ),
            OptimizeError::Cancelled => "Error: Optimization cancelled".to_string(),
        }
    }
}
