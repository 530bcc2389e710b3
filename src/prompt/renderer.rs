use super::templates;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Identifies one of the prompt templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    OptimizeRequestSystem,
    RuleMultistageBuilds,
    OptimizeRequestUser,
    ToolReadFilesSingleFile,
}

impl TemplateId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::OptimizeRequestSystem => "optimize_request_system",
            TemplateId::RuleMultistageBuilds => "rule_multistage_builds",
            TemplateId::OptimizeRequestUser => "optimize_request_user",
            TemplateId::ToolReadFilesSingleFile => "tool_read_files_single_file",
        }
    }

    fn builtin(&self) -> &'static str {
        match self {
            TemplateId::OptimizeRequestSystem => templates::OPTIMIZE_REQUEST_SYSTEM,
            TemplateId::RuleMultistageBuilds => templates::RULE_MULTISTAGE_BUILDS,
            TemplateId::OptimizeRequestUser => templates::OPTIMIZE_REQUEST_USER,
            TemplateId::ToolReadFilesSingleFile => templates::TOOL_READ_FILES_SINGLE_FILE,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures while binding data into a template
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template {template}: no value bound for placeholder '{name}'")]
    MissingVariable { template: TemplateId, name: String },

    #[error("template {template}: unterminated placeholder at byte {offset}")]
    Unterminated { template: TemplateId, offset: usize },

    #[error("template {template}: invalid placeholder '{placeholder}'")]
    InvalidPlaceholder {
        template: TemplateId,
        placeholder: String,
    },
}

/// Fills placeholders of a named template
pub trait TemplateRenderer: Send + Sync {
    fn render(
        &self,
        template: TemplateId,
        variables: &HashMap<String, String>,
    ) -> Result<String, TemplateError>;
}

/// `{{Name}}` substitution over the built-in templates.
///
/// Substituted values are inserted verbatim and never re-scanned, so file
/// contents containing braces are safe to embed.
#[derive(Debug, Default, Clone)]
pub struct PlaceholderRenderer {
    overrides: HashMap<TemplateId, String>,
}

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text of one template
    pub fn with_template(mut self, template: TemplateId, text: impl Into<String>) -> Self {
        self.overrides.insert(template, text.into());
        self
    }

    fn source(&self, template: TemplateId) -> &str {
        self.overrides
            .get(&template)
            .map(String::as_str)
            .unwrap_or_else(|| template.builtin())
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    fn render(
        &self,
        template: TemplateId,
        variables: &HashMap<String, String>,
    ) -> Result<String, TemplateError> {
        substitute(template, self.source(template), variables)
    }
}

fn substitute(
    template: TemplateId,
    source: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut output = String::with_capacity(source.len());
    let mut rest = source;
    let mut consumed = 0;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);

        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or(TemplateError::Unterminated {
                template,
                offset: consumed + start,
            })?;

        let name = after_open[..end].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(TemplateError::InvalidPlaceholder {
                template,
                placeholder: after_open[..end].to_string(),
            });
        }

        let value = variables
            .get(name)
            .ok_or_else(|| TemplateError::MissingVariable {
                template,
                name: name.to_string(),
            })?;
        output.push_str(value);

        let advance = start + 2 + end + 2;
        consumed += advance;
        rest = &rest[advance..];
    }

    output.push_str(rest);
    Ok(output)
}
