use super::{ProjectDirectory, ProjectError, ProjectFile};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::sync::RwLock;

/// In-memory project directory for tests
pub struct MockProjectDirectory {
    files: RwLock<BTreeMap<String, String>>,
    unreadable: RwLock<HashSet<String>>,
    tree: Option<String>,
    read_requests: RwLock<Vec<Vec<String>>>,
}

impl MockProjectDirectory {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
            unreadable: RwLock::new(HashSet::new()),
            tree: None,
            read_requests: RwLock::new(Vec::new()),
        }
    }

    /// Use a fixed listing instead of one derived from the registered files
    pub fn with_tree(mut self, tree: impl Into<String>) -> Self {
        self.tree = Some(tree.into());
        self
    }

    pub fn add_file(&self, path: impl Into<String>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Register a path that exists but fails to read
    pub fn add_unreadable(&self, path: impl Into<String>) {
        self.unreadable.write().unwrap().insert(path.into());
    }

    /// Every batch passed to `read_files`, in call order
    pub fn read_requests(&self) -> Vec<Vec<String>> {
        self.read_requests.read().unwrap().clone()
    }
}

impl Default for MockProjectDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectDirectory for MockProjectDirectory {
    fn read_files(&self, paths: &[String]) -> Result<Vec<ProjectFile>, ProjectError> {
        self.read_requests.write().unwrap().push(paths.to_vec());

        let files = self.files.read().unwrap();
        let unreadable = self.unreadable.read().unwrap();

        paths
            .iter()
            .map(|path| {
                if unreadable.contains(path) {
                    return Err(ProjectError::Unreadable {
                        path: path.clone(),
                        source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
                    });
                }
                files
                    .get(path)
                    .map(|content| ProjectFile::new(path.clone(), content.clone()))
                    .ok_or_else(|| ProjectError::NotFound(path.clone()))
            })
            .collect()
    }

    fn dir_tree(&self) -> String {
        if let Some(ref tree) = self.tree {
            return tree.clone();
        }

        let files = self.files.read().unwrap();
        let mut lines = vec![".".to_string()];
        lines.extend(files.keys().cloned());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_registered_files() {
        let project = MockProjectDirectory::new();
        project.add_file("package.json", "{}");
        project.add_file("server.js", "listen()");

        let files = project
            .read_files(&["server.js".to_string(), "package.json".to_string()])
            .unwrap();

        assert_eq!(files[0].path, "server.js");
        assert_eq!(files[1].content, "{}");
        assert_eq!(project.read_requests().len(), 1);
    }

    #[test]
    fn test_unreadable_file_fails() {
        let project = MockProjectDirectory::new();
        project.add_file("package.json", "{}");
        project.add_unreadable("secret.env");

        let result = project.read_files(&["package.json".to_string(), "secret.env".to_string()]);

        assert!(matches!(result, Err(ProjectError::Unreadable { .. })));
    }

    #[test]
    fn test_default_tree_from_files() {
        let project = MockProjectDirectory::new();
        project.add_file("package.json", "{}");
        project.add_file("Dockerfile", "FROM node");

        assert_eq!(project.dir_tree(), ".\nDockerfile\npackage.json");
    }

    #[test]
    fn test_fixed_tree() {
        let project = MockProjectDirectory::new().with_tree("custom");
        assert_eq!(project.dir_tree(), "custom");
    }
}
