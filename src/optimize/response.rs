use super::error::OptimizeError;
use crate::llm::ResponseFormat;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const RESPONSE_FORMAT_NAME: &str = "modifications";

/// Final result of an optimization run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptimizeResponse {
    /// The optimized Dockerfile
    pub dockerfile: String,
    /// Changes applied to the Dockerfile
    pub actions_taken: Vec<String>,
    /// Further changes the user may apply by hand
    pub recommendations: Vec<String>,
}

impl OptimizeResponse {
    pub fn is_unchanged_from(&self, original: &str) -> bool {
        self.dockerfile.trim() == original.trim()
    }
}

/// JSON schema the final answer has to conform to
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "dockerfile": {
                "type": "string",
                "description": "The complete optimized Dockerfile"
            },
            "actionsTaken": {
                "type": "array",
                "description": "Optimizations applied to the Dockerfile",
                "items": { "type": "string" }
            },
            "recommendations": {
                "type": "array",
                "description": "Optimizations the user should consider applying manually",
                "items": { "type": "string" }
            }
        },
        "required": ["dockerfile", "actionsTaken", "recommendations"],
        "additionalProperties": false
    })
}

pub fn response_format() -> ResponseFormat {
    ResponseFormat {
        name: RESPONSE_FORMAT_NAME.to_string(),
        description:
            "Optimized assets for the project along with the actions taken and further recommendations"
                .to_string(),
        schema: response_schema(),
        strict: true,
    }
}

/// Strips a markdown code fence wrapping the whole content, if any
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        // info string, e.g. ```json
        let body = rest.find('\n').map(|idx| &rest[idx + 1..]).unwrap_or("");
        if let Some(end_idx) = body.rfind("```") {
            return body[..end_idx].trim();
        }
    }

    trimmed
}

/// Decodes the model's final text answer
pub fn decode_response(content: &str) -> Result<OptimizeResponse, OptimizeError> {
    serde_json::from_str(strip_code_fence(content)).map_err(|source| OptimizeError::Decode {
        raw: content.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "dockerfile": "FROM node:20-alpine\nCMD [\"node\", \"index.js\"]\n",
        "actionsTaken": ["Used the node:20-alpine base image"],
        "recommendations": []
    }"#;

    #[test]
    fn test_decode_valid() {
        let response = decode_response(VALID).unwrap();
        assert!(response.dockerfile.starts_with("FROM node:20-alpine"));
        assert_eq!(response.actions_taken.len(), 1);
        assert_eq!(response.actions_taken[0], "Used the node:20-alpine base image");
        assert!(response.recommendations.is_empty());
    }

    #[test]
    fn test_decode_fenced() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert_eq!(decode_response(&fenced).unwrap(), decode_response(VALID).unwrap());
    }

    #[test]
    fn test_decode_rejects_prose() {
        let err = decode_response("I have optimized your Dockerfile.").unwrap_err();
        match err {
            OptimizeError::Decode { raw, .. } => assert_eq!(raw, "I have optimized your Dockerfile."),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        let err = decode_response(r#"{"dockerfile": "FROM node", "actionsTaken": []}"#).unwrap_err();
        assert!(matches!(err, OptimizeError::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_unknown_field() {
        let err = decode_response(
            r#"{"dockerfile": "FROM node", "actionsTaken": [], "recommendations": [], "extra": 1}"#,
        )
        .unwrap_err();
        assert!(matches!(err, OptimizeError::Decode { .. }));
    }

    #[test]
    fn test_serializes_camel_case() {
        let response = decode_response(VALID).unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("actionsTaken").is_some());
        assert!(value.get("actions_taken").is_none());
    }

    #[test]
    fn test_response_format_is_strict() {
        let format = response_format();
        assert_eq!(format.name, "modifications");
        assert!(format.strict);
        assert_eq!(
            format.schema["required"],
            json!(["dockerfile", "actionsTaken", "recommendations"])
        );
        assert_eq!(format.schema["additionalProperties"], json!(false));
    }

    #[test]
    fn test_unchanged_detection() {
        let response = OptimizeResponse {
            dockerfile: "FROM node:20\n".to_string(),
            actions_taken: vec![],
            recommendations: vec![],
        };
        assert!(response.is_unchanged_from("FROM node:20"));
        assert!(!response.is_unchanged_from("FROM node:18"));
    }
}
