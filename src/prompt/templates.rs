//! Built-in prompt templates
//!
//! Placeholders use the `{{Name}}` syntax understood by
//! [`PlaceholderRenderer`](super::PlaceholderRenderer).

/// System instructions for a Dockerfile optimization run
pub const OPTIMIZE_REQUEST_SYSTEM: &str = r#"You are an expert software and DevOps engineer who specializes in Docker and NodeJS backend applications.

You are given a NodeJS project that is containerized with a Dockerfile. Your goal is to reduce the size of the Docker image produced by this Dockerfile as much as possible, while keeping the code legible and developer-friendly.

You are given the directory structure of the project, its Dockerfile and its package.json. If you need the contents of any other file to make a better decision, call the {{Backtick}}read_files{{Backtick}} tool with the paths of those files relative to the project root. Only request files that appear in the directory structure.

Follow these rules while optimizing:
* Use a slim base image (for example an {{Backtick}}-alpine{{Backtick}} or {{Backtick}}-slim{{Backtick}} variant) for the final image where possible. Keep the NodeJS version used by the original Dockerfile.
* Set the {{Backtick}}NODE_ENV{{Backtick}} environment variable to {{Backtick}}production{{Backtick}} before installing dependencies in the final image so that devDependencies are excluded.
* Combine related {{Backtick}}RUN{{Backtick}} statements and clean package manager caches in the same layer they are created in.
* Stay consistent with the original code. If it uses {{Backtick}}npm install{{Backtick}}, don't switch to {{Backtick}}npm ci{{Backtick}}.
* Do not delete statements whose purpose you don't understand, such as custom scripts. Leave them as they are.
* Keep existing comments. Only add comments where a change needs explaining.
{{RuleMultistageBuilds}}
After writing the Dockerfile, review it step by step and think about what the final image would contain, to make sure nothing the application needs at runtime was left out.

Respond with a JSON object containing:
* {{Backtick}}dockerfile{{Backtick}}: the complete optimized Dockerfile, without any markdown formatting
* {{Backtick}}actionsTaken{{Backtick}}: one entry per change you made, describing the change and why it shrinks the image
* {{Backtick}}recommendations{{Backtick}}: further optimizations the developer could apply manually, which you could not apply yourself
"#;

/// Extra rule included only for single-stage Dockerfiles
pub const RULE_MULTISTAGE_BUILDS: &str = r#"
* Adopt Multistage builds. The Dockerfile currently has a single stage. Keep it as the build stage and add a final stage that only contains the application source code, its production dependencies (excluding {{Backtick}}devDependencies{{Backtick}} from package.json) and anything else the application needs at runtime.
  * The final stage must use a slim base image with the same NodeJS version as the build stage.
  * Do a fresh install of the dependencies in the final stage, excluding dev dependencies. Don't copy {{Backtick}}node_modules{{Backtick}} from the build stage and don't change the installation commands of the build stage.
  * If the build stage contains metadata such as {{Backtick}}LABEL{{Backtick}} statements, repeat them in the final stage when relevant.
  * If the build stage runs npm scripts like {{Backtick}}npm run build{{Backtick}}, read package.json to understand what they produce and copy only the produced artifacts into the final stage.
"#;

/// User query carrying the project context
pub const OPTIMIZE_REQUEST_USER: &str = r#"Optimize the Dockerfile of this NodeJS project.

Directory structure of the project:
{{TripleBackticks}}
{{DirTree}}
{{TripleBackticks}}

Dockerfile:
{{TripleBackticks}}dockerfile
{{Dockerfile}}
{{TripleBackticks}}

package.json:
{{TripleBackticks}}json
{{PackageJSON}}
{{TripleBackticks}}
"#;

/// One file inside a `read_files` tool result
pub const TOOL_READ_FILES_SINGLE_FILE: &str = r#"{{Filepath}}
{{TripleBackticks}}
{{Content}}
{{TripleBackticks}}

"#;
