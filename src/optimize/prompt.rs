//! Builds the system instructions and user query of a run

use super::request::OptimizeRequest;
use crate::prompt::{TemplateError, TemplateId, TemplateRenderer};
use std::collections::HashMap;

fn base_variables() -> HashMap<String, String> {
    let mut data = HashMap::new();
    data.insert("Backtick".to_string(), "`".to_string());
    data.insert("TripleBackticks".to_string(), "```".to_string());
    data
}

/// System instructions. The multistage rule is only added for single-stage
/// Dockerfiles.
pub fn system_instructions(
    renderer: &dyn TemplateRenderer,
    request: &OptimizeRequest,
) -> Result<String, TemplateError> {
    let mut data = base_variables();

    let multistage_rule = if request.is_single_stage() {
        renderer.render(TemplateId::RuleMultistageBuilds, &data)?
    } else {
        String::new()
    };

    data.insert("RuleMultistageBuilds".to_string(), multistage_rule);
    renderer.render(TemplateId::OptimizeRequestSystem, &data)
}

/// User query embedding the directory tree, Dockerfile and package.json
pub fn user_query(
    renderer: &dyn TemplateRenderer,
    request: &OptimizeRequest,
) -> Result<String, TemplateError> {
    let mut data = base_variables();
    data.insert("DirTree".to_string(), request.project.dir_tree());
    data.insert("Dockerfile".to_string(), request.dockerfile.clone());
    data.insert("PackageJSON".to_string(), request.package_json.clone());

    renderer.render(TemplateId::OptimizeRequestUser, &data)
}

/// Both prompts, system instructions first
pub fn assemble(
    renderer: &dyn TemplateRenderer,
    request: &OptimizeRequest,
) -> Result<(String, String), TemplateError> {
    Ok((
        system_instructions(renderer, request)?,
        user_query(renderer, request)?,
    ))
}
