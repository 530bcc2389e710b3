use super::commands::OptimizeArgs;
use super::output::{OutputFormat, OutputFormatter};
use crate::config::DockershrinkConfig;
use crate::optimize::{OptimizeError, OptimizeRequest, OptimizeService};
use crate::project::{count_stages, LocalProjectDirectory};
use genai::adapter::AdapterKind;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Runs the `optimize` command and returns the process exit code
pub async fn handle_optimize(args: &OptimizeArgs, quiet: bool) -> i32 {
    let root = args.project_root();
    debug!("Project path: {}", root.display());

    let project = match LocalProjectDirectory::new(&root) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    let dockerfile_path = args.dockerfile_path(&root);
    let dockerfile = match read_input(&dockerfile_path, "Dockerfile") {
        Some(content) => content,
        None => return 1,
    };
    let package_json_path = args.package_json_path(&root);
    let package_json = match read_input(&package_json_path, "package.json") {
        Some(content) => content,
        None => return 1,
    };

    let stage_count = count_stages(&dockerfile);
    debug!("Dockerfile has {} stage(s)", stage_count);

    let config = build_config(args);
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your environment variables and command-line arguments.");
        return 1;
    }

    let client = match config.create_client().await {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to initialize backend: {}", e);
            print_backend_hints(config.provider);
            return 1;
        }
    };

    let service = OptimizeService::new(client).with_max_llm_calls(config.max_llm_calls);
    info!(
        "Using backend: {} ({})",
        service.backend_name(),
        service
            .backend_model_info()
            .unwrap_or_else(|| "default".to_string())
    );

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling optimization");
            ctrl_c_token.cancel();
        }
    });

    let request = OptimizeRequest::new(dockerfile.clone(), stage_count, package_json, project);
    let response = match service.optimize_with_cancel(request, cancel).await {
        Ok(r) => r,
        Err(e) => {
            report_failure(&e);
            return 1;
        }
    };

    if response.is_unchanged_from(&dockerfile) {
        info!("Dockerfile is already optimized, no changes made");
    }

    let formatter = OutputFormatter::new(args.format.into());
    let output = match formatter.format(&response) {
        Ok(out) => out,
        Err(e) => {
            error!("Failed to format output: {}", e);
            return 1;
        }
    };

    write_output(&output, args.output.as_deref(), args.format.into(), quiet)
}

/// Environment config with command-line overrides applied
fn build_config(args: &OptimizeArgs) -> DockershrinkConfig {
    let default_config = DockershrinkConfig::default();

    let provider = args.backend.unwrap_or(default_config.provider);
    let model = match (&args.model, args.backend) {
        (Some(model), _) => model.clone(),
        // a different provider rarely serves the configured model
        (None, Some(backend)) if backend != default_config.provider => {
            crate::config::default_model(backend).to_string()
        }
        (None, _) => default_config.model.clone(),
    };

    DockershrinkConfig {
        provider,
        model,
        request_timeout_secs: args
            .timeout
            .unwrap_or(default_config.request_timeout_secs),
        max_llm_calls: args.max_llm_calls.unwrap_or(default_config.max_llm_calls),
        ..default_config
    }
}

fn read_input(path: &Path, what: &str) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            error!("Failed to read {} at {}: {}", what, path.display(), e);
            None
        }
    }
}

fn report_failure(err: &OptimizeError) {
    error!("Optimization failed: {}", err);
    eprintln!("\n{}", err.help_message());
}

fn print_backend_hints(provider: AdapterKind) {
    eprintln!("\nPossible solutions:");
    match provider {
        AdapterKind::Ollama => {
            eprintln!("  - Ensure Ollama is running: ollama serve");
            eprintln!("  - Check OLLAMA_HOST environment variable (default: http://localhost:11434)");
        }
        AdapterKind::OpenAI => {
            eprintln!("  - Set OPENAI_API_KEY environment variable");
            eprintln!("  - Optionally set DOCKERSHRINK_API_BASE_URL for custom endpoints");
        }
        AdapterKind::Anthropic => eprintln!("  - Set ANTHROPIC_API_KEY environment variable"),
        AdapterKind::Gemini => eprintln!("  - Set GEMINI_API_KEY environment variable"),
        AdapterKind::Xai => eprintln!("  - Set XAI_API_KEY environment variable"),
        AdapterKind::Groq => eprintln!("  - Set GROQ_API_KEY environment variable"),
        _ => eprintln!("  - Check provider-specific environment variables"),
    }
    eprintln!("  - Pick a model explicitly: --model <MODEL>");
}

fn write_output(output: &str, path: Option<&Path>, format: OutputFormat, quiet: bool) -> i32 {
    match path {
        Some(path) => match fs::write(path, output) {
            Ok(_) => {
                info!("Output written to: {}", path.display());
                if !quiet {
                    println!("Output written to: {}", path.display());
                }
                0
            }
            Err(e) => {
                error!("Failed to write output to file: {}", e);
                1
            }
        },
        None => {
            if format == OutputFormat::Dockerfile {
                print!("{}", output);
            } else {
                println!("{}", output);
            }
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::{CliArgs, Commands};
    use clap::Parser;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    fn optimize_args(argv: &[&str]) -> OptimizeArgs {
        let mut full = vec!["dockershrink", "optimize"];
        full.extend_from_slice(argv);
        let Commands::Optimize(args) = CliArgs::parse_from(full).command;
        args
    }

    #[test]
    #[serial]
    fn test_build_config_overrides() {
        env::remove_var("DOCKERSHRINK_PROVIDER");
        env::remove_var("DOCKERSHRINK_MODEL");

        let config = build_config(&optimize_args(&["--timeout", "30", "--max-llm-calls", "3"]));
        assert_eq!(config.provider, AdapterKind::OpenAI);
        assert_eq!(config.model, "gpt-4o-2024-11-20");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_llm_calls, 3);
    }

    #[test]
    #[serial]
    fn test_build_config_backend_switches_default_model() {
        env::remove_var("DOCKERSHRINK_PROVIDER");
        env::remove_var("DOCKERSHRINK_MODEL");

        let config = build_config(&optimize_args(&["--backend", "ollama"]));
        assert_eq!(config.provider, AdapterKind::Ollama);
        assert_eq!(config.model, "qwen2.5-coder:7b");

        let config = build_config(&optimize_args(&["--backend", "ollama", "--model", "llama3"]));
        assert_eq!(config.model, "llama3");
    }

    #[tokio::test]
    async fn test_missing_dockerfile_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let root = dir.path().to_string_lossy().to_string();
        let code = handle_optimize(&optimize_args(&[root.as_str()]), true).await;

        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_missing_project_dir_fails() {
        let code = handle_optimize(&optimize_args(&["/nonexistent/project/dir"]), true).await;
        assert_eq!(code, 1);
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Dockerfile.optimized");

        let code = write_output("FROM node:20-alpine\n", Some(&path), OutputFormat::Dockerfile, true);

        assert_eq!(code, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "FROM node:20-alpine\n");
    }
}
