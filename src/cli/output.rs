//! Output formatting for optimization results
//!
//! # Example
//!
//! ```
//! use dockershrink::cli::output::{OutputFormat, OutputFormatter};
//! use dockershrink::optimize::OptimizeResponse;
//!
//! let response = OptimizeResponse {
//!     dockerfile: "FROM node:20-alpine\n".to_string(),
//!     actions_taken: vec!["Used the alpine base image".to_string()],
//!     recommendations: vec![],
//! };
//! let output = OutputFormatter::new(OutputFormat::Dockerfile).format(&response).unwrap();
//! assert_eq!(output, "FROM node:20-alpine\n");
//! ```

use crate::optimize::OptimizeResponse;
use anyhow::{Context, Result};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary with the optimized Dockerfile
    Human,
    /// The response as JSON (machine-readable)
    Json,
    /// Only the optimized Dockerfile
    Dockerfile,
}

/// Output formatter for optimization results
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, response: &OptimizeResponse) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(self.format_human(response)),
            OutputFormat::Json => self.format_json(response),
            OutputFormat::Dockerfile => Ok(response.dockerfile.clone()),
        }
    }

    fn format_json(&self, response: &OptimizeResponse) -> Result<String> {
        serde_json::to_string_pretty(response)
            .context("Failed to serialize optimization result to JSON")
    }

    fn format_human(&self, response: &OptimizeResponse) -> String {
        let mut output = String::new();

        output.push_str("\u{2713} Dockerfile Optimization Result\n");
        output.push_str(RULE);
        output.push_str("\n\n");

        push_list(&mut output, "Actions Taken", &response.actions_taken);
        push_list(&mut output, "Recommendations", &response.recommendations);

        output.push_str("Optimized Dockerfile:\n");
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&response.dockerfile);
        if !response.dockerfile.ends_with('\n') {
            output.push('\n');
        }

        output
    }
}

fn push_list(output: &mut String, title: &str, items: &[String]) {
    output.push_str(&format!("{}:\n", title));
    if items.is_empty() {
        output.push_str("  (none)\n\n");
        return;
    }

    for (i, item) in items.iter().enumerate() {
        let connector = if i == items.len() - 1 {
            "\u{2514}\u{2500}"
        } else {
            "\u{251C}\u{2500}"
        };
        output.push_str(&format!("{} {}\n", connector, item));
    }
    output.push('\n');
}
