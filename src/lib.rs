//! dockershrink - AI-powered Dockerfile optimizer for NodeJS projects
//!
//! The optimizer sends a project's Dockerfile and package.json to an LLM and
//! lets the model request further project files through a `read_files` tool
//! before it answers with an optimized Dockerfile.
//!
//! # Core Concepts
//!
//! - **LLM clients**: [`llm::LLMClient`] abstracts the chat endpoint. `GenAIClient`
//!   talks to real providers, `MockLLMClient` replays scripted responses.
//! - **Project directory**: [`project::ProjectDirectory`] lists and reads project
//!   files, refusing paths outside the project root.
//! - **Prompts**: [`prompt::TemplateRenderer`] fills the built-in templates.
//! - **Optimization**: [`optimize::OptimizeService`] runs the bounded
//!   tool-calling conversation and decodes the final answer.
//!
//! # Example
//!
//! ```no_run
//! use dockershrink::llm::{MockLLMClient, MockResponse};
//! use dockershrink::optimize::{OptimizeRequest, OptimizeService};
//! use dockershrink::project::MockProjectDirectory;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(MockLLMClient::new());
//! client.add_response(MockResponse::text(
//!     r#"{"dockerfile":"FROM node:20-alpine","actionsTaken":[],"recommendations":[]}"#,
//! ));
//!
//! let service = OptimizeService::new(client);
//! let request = OptimizeRequest::from_dockerfile(
//!     "FROM node:20",
//!     "{}",
//!     Arc::new(MockProjectDirectory::new()),
//! );
//! let response = service.optimize(request).await?;
//! println!("{}", response.dockerfile);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod llm;
pub mod optimize;
pub mod project;
pub mod prompt;
pub mod util;

pub use config::{ConfigError, DockershrinkConfig};
pub use llm::{BackendError, GenAIClient, LLMClient};
pub use optimize::{OptimizeError, OptimizeRequest, OptimizeResponse, OptimizeService};
pub use project::{LocalProjectDirectory, ProjectDirectory};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
