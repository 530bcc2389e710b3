use super::{ProjectDirectory, ProjectError, ProjectFile};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

const IGNORED_DIRS: &[&str] = &[".git", "node_modules"];
const DEFAULT_TREE_DEPTH: usize = 6;

/// Project directory backed by the local filesystem
#[derive(Debug, Clone)]
pub struct LocalProjectDirectory {
    root: PathBuf,
    tree_depth: usize,
}

impl LocalProjectDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ProjectError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ProjectError::InvalidRoot(root));
        }

        let root = root
            .canonicalize()
            .map_err(|_| ProjectError::InvalidRoot(root.clone()))?;

        debug!(root = %root.display(), "LocalProjectDirectory initialized");
        Ok(Self {
            root,
            tree_depth: DEFAULT_TREE_DEPTH,
        })
    }

    pub fn with_tree_depth(mut self, depth: usize) -> Self {
        self.tree_depth = depth;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn validate_path(&self, path: &str) -> Result<PathBuf, ProjectError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(ProjectError::InvalidPath {
                path: path.to_string(),
                reason: "path is empty".to_string(),
            });
        }

        let relative = Path::new(trimmed);
        if relative.is_absolute() {
            return Err(ProjectError::InvalidPath {
                path: path.to_string(),
                reason: "path must be relative to the project root".to_string(),
            });
        }
        if relative.components().any(|c| matches!(c, Component::ParentDir)) {
            warn!(requested_path = path, "Path traversal attempt detected");
            return Err(ProjectError::PathTraversal(path.to_string()));
        }

        let full_path = self.root.join(relative);
        if !full_path.exists() {
            return Err(ProjectError::NotFound(path.to_string()));
        }

        let canonical = full_path
            .canonicalize()
            .map_err(|source| ProjectError::Unreadable {
                path: path.to_string(),
                source,
            })?;

        // symlinks may still point outside the root
        if !canonical.starts_with(&self.root) {
            warn!(
                requested_path = path,
                canonical = %canonical.display(),
                "Path traversal attempt detected"
            );
            return Err(ProjectError::PathTraversal(path.to_string()));
        }

        if !canonical.is_file() {
            return Err(ProjectError::InvalidPath {
                path: path.to_string(),
                reason: "not a regular file".to_string(),
            });
        }

        Ok(canonical)
    }
}

impl ProjectDirectory for LocalProjectDirectory {
    fn read_files(&self, paths: &[String]) -> Result<Vec<ProjectFile>, ProjectError> {
        let mut files = Vec::with_capacity(paths.len());

        for path in paths {
            let file_path = self.validate_path(path)?;
            let content =
                fs::read_to_string(&file_path).map_err(|source| ProjectError::Unreadable {
                    path: path.clone(),
                    source,
                })?;

            debug!(path = %path, bytes = content.len(), "Read project file");
            files.push(ProjectFile::new(path.clone(), content));
        }

        Ok(files)
    }

    fn dir_tree(&self) -> String {
        let mut lines = vec![".".to_string()];

        let walker = WalkBuilder::new(&self.root)
            .max_depth(Some(self.tree_depth))
            .hidden(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .map(|name| !IGNORED_DIRS.contains(&name))
                    .unwrap_or(true)
            })
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            let depth = entry.depth();
            if depth == 0 {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let indent = "  ".repeat(depth - 1);

            if is_dir {
                lines.push(format!("{}{}/", indent, name));
            } else {
                lines.push(format!("{}{}", indent, name));
            }
        }

        lines.join("\n")
    }
}
