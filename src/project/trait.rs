//! ProjectDirectory trait definition

use std::path::PathBuf;
use thiserror::Error;

/// A file read from the project, keyed by its path relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub path: String,
    pub content: String,
}

impl ProjectFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// True when the file has no content besides whitespace
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Errors raised while reading project files
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project root does not exist or is not a directory: {0}")]
    InvalidRoot(PathBuf),

    #[error("Invalid file path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Path traversal detected: '{0}' is outside the project")]
    PathTraversal(String),

    #[error("File not found in project: {0}")]
    NotFound(String),

    #[error("Failed to read '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ProjectError {
    /// The offending path, when the error concerns a single file
    pub fn path(&self) -> Option<&str> {
        match self {
            ProjectError::InvalidRoot(_) => None,
            ProjectError::InvalidPath { path, .. }
            | ProjectError::Unreadable { path, .. }
            | ProjectError::PathTraversal(path)
            | ProjectError::NotFound(path) => Some(path),
        }
    }
}

/// Read-only view of the project being containerized
pub trait ProjectDirectory: Send + Sync {
    /// Read a batch of files relative to the project root.
    ///
    /// Files come back in request order. Any invalid or unreadable path fails
    /// the whole batch.
    fn read_files(&self, paths: &[String]) -> Result<Vec<ProjectFile>, ProjectError>;

    /// Human-readable listing of the project structure
    fn dir_tree(&self) -> String;
}
