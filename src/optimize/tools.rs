use super::error::OptimizeError;
use crate::llm::{ChatMessage, ToolCall, ToolDefinition};
use crate::project::{ProjectDirectory, ProjectFile};
use crate::prompt::{TemplateId, TemplateRenderer};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub const TOOL_READ_FILES: &str = "read_files";

const READ_FILES_HEADER: &str = "Here are the files you requested:\n";

/// Tools the model may call. Anything else is kept as `Unknown` and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolKind {
    ReadFiles,
    Unknown(String),
}

impl ToolKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            TOOL_READ_FILES => ToolKind::ReadFiles,
            other => ToolKind::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ToolKind::ReadFiles => TOOL_READ_FILES,
            ToolKind::Unknown(name) => name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadFilesArgs {
    pub filepaths: Vec<String>,
}

impl ReadFilesArgs {
    /// Decodes tool-call arguments. Some providers send the arguments as a
    /// JSON-encoded string, which is parsed first.
    pub fn from_arguments(arguments: &Value) -> Result<Self, OptimizeError> {
        let decode_err = |source| OptimizeError::ArgumentDecode {
            tool: TOOL_READ_FILES.to_string(),
            arguments: match arguments {
                Value::String(raw) => raw.clone(),
                other => other.to_string(),
            },
            source,
        };

        let value = match arguments {
            Value::String(raw) => serde_json::from_str(raw).map_err(decode_err)?,
            other => other.clone(),
        };

        serde_json::from_value(value).map_err(decode_err)
    }
}

/// Definitions of every tool offered to the model
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![read_files_tool()]
}

pub fn read_files_tool() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_READ_FILES.to_string(),
        description: "Read the contents of specific files inside the project".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "filepaths": {
                    "type": "array",
                    "description": "List of file paths, relative to the project root directory",
                    "items": {
                        "type": "string"
                    }
                }
            },
            "required": ["filepaths"]
        }),
    }
}

/// Runs tool calls against a project and renders their results
pub struct ToolExecutor<'a> {
    project: &'a dyn ProjectDirectory,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> ToolExecutor<'a> {
    pub fn new(project: &'a dyn ProjectDirectory, renderer: &'a dyn TemplateRenderer) -> Self {
        Self { project, renderer }
    }

    /// Executes one tool call.
    ///
    /// Returns the tool-result message to append, or `None` when the tool is
    /// not recognized.
    pub fn execute(&self, call: &ToolCall) -> Result<Option<ChatMessage>, OptimizeError> {
        match ToolKind::from_name(&call.name) {
            ToolKind::ReadFiles => {
                let args = ReadFilesArgs::from_arguments(&call.arguments)?;
                info!(
                    call_id = %call.call_id,
                    files = ?args.filepaths,
                    "LLM requested files"
                );

                let body = self.read_files(&args.filepaths)?;
                Ok(Some(ChatMessage::tool_response(&call.call_id, body)))
            }
            ToolKind::Unknown(name) => {
                warn!(call_id = %call.call_id, tool = %name, "Ignoring call to unknown tool");
                Ok(None)
            }
        }
    }

    fn read_files(&self, paths: &[String]) -> Result<String, OptimizeError> {
        let files = self.project.read_files(paths)?;

        let mut body = String::from(READ_FILES_HEADER);
        for file in &files {
            body.push_str(&self.render_file(file)?);
        }

        debug!(files = files.len(), bytes = body.len(), "Rendered read_files result");
        Ok(body)
    }

    fn render_file(&self, file: &ProjectFile) -> Result<String, OptimizeError> {
        if file.is_blank() {
            return Ok(format!("{}\n[File is empty]\n\n", file.path));
        }

        let mut data = HashMap::new();
        data.insert("Filepath".to_string(), file.path.clone());
        data.insert("Content".to_string(), file.content.clone());
        data.insert("TripleBackticks".to_string(), "```".to_string());

        Ok(self
            .renderer
            .render(TemplateId::ToolReadFilesSingleFile, &data)?)
    }
}
