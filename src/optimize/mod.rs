//! Dockerfile optimization through a tool-calling LLM conversation

mod conversation;
mod error;
pub mod prompt;
mod request;
pub mod response;
pub mod service;
pub mod tools;

pub use conversation::Conversation;
pub use error::OptimizeError;
pub use request::OptimizeRequest;
pub use response::{decode_response, OptimizeResponse};
pub use service::{LoopState, OptimizeService, DEFAULT_MAX_LLM_CALLS};
pub use tools::{ReadFilesArgs, ToolExecutor, ToolKind};
