use crate::project::{count_stages, ProjectDirectory};
use std::fmt;
use std::sync::Arc;

/// Input of an optimization run. Read-only to the service.
#[derive(Clone)]
pub struct OptimizeRequest {
    /// Original Dockerfile text
    pub dockerfile: String,
    /// Number of build stages in `dockerfile`
    pub stage_count: usize,
    /// Contents of the project's package.json
    pub package_json: String,
    pub project: Arc<dyn ProjectDirectory>,
}

impl OptimizeRequest {
    pub fn new(
        dockerfile: impl Into<String>,
        stage_count: usize,
        package_json: impl Into<String>,
        project: Arc<dyn ProjectDirectory>,
    ) -> Self {
        Self {
            dockerfile: dockerfile.into(),
            stage_count,
            package_json: package_json.into(),
            project,
        }
    }

    /// Builds a request, counting the stages of the given Dockerfile
    pub fn from_dockerfile(
        dockerfile: impl Into<String>,
        package_json: impl Into<String>,
        project: Arc<dyn ProjectDirectory>,
    ) -> Self {
        let dockerfile = dockerfile.into();
        let stage_count = count_stages(&dockerfile);
        Self::new(dockerfile, stage_count, package_json, project)
    }

    pub fn is_single_stage(&self) -> bool {
        self.stage_count == 1
    }
}

impl fmt::Debug for OptimizeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimizeRequest")
            .field("dockerfile_len", &self.dockerfile.len())
            .field("stage_count", &self.stage_count)
            .field("package_json_len", &self.package_json.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::MockProjectDirectory;

    #[test]
    fn test_from_dockerfile_counts_stages() {
        let project = Arc::new(MockProjectDirectory::new());

        let single = OptimizeRequest::from_dockerfile("FROM node:20\n", "{}", project.clone());
        assert_eq!(single.stage_count, 1);
        assert!(single.is_single_stage());

        let multi = OptimizeRequest::from_dockerfile(
            "FROM node:20 AS build\nFROM node:20-slim\n",
            "{}",
            project,
        );
        assert_eq!(multi.stage_count, 2);
        assert!(!multi.is_single_stage());
    }

    #[test]
    fn test_debug_omits_contents() {
        let request = OptimizeRequest::new(
            "FROM node:20",
            1,
            r#"{"name":"secret-app"}"#,
            Arc::new(MockProjectDirectory::new()),
        );

        let debug = format!("{:?}", request);
        assert!(debug.contains("stage_count: 1"));
        assert!(!debug.contains("secret-app"));
    }
}
