use crate::config::parse_provider;
use clap::{Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::{Path, PathBuf};

/// AI-powered Dockerfile optimizer for NodeJS projects
#[derive(Parser, Debug)]
#[command(
    name = "dockershrink",
    about = "AI-powered Dockerfile optimizer for NodeJS projects",
    version,
    author,
    long_about = "dockershrink reduces the size of NodeJS container images. It sends the \
                  Dockerfile and package.json of a project to an LLM, lets the model read \
                  further project files when it needs them, and returns an optimized \
                  Dockerfile along with the actions taken and further recommendations."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Verbose output (debug logging)"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Log level picked from the flags, `--log-level` taking precedence
    pub fn effective_log_level(&self) -> Option<&str> {
        if let Some(ref level) = self.log_level {
            Some(level)
        } else if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Optimize the Dockerfile of a NodeJS project",
        long_about = "Optimizes the Dockerfile of a NodeJS project using an LLM.\n\n\
                      Examples:\n  \
                      dockershrink optimize\n  \
                      dockershrink optimize /path/to/project\n  \
                      dockershrink optimize --dockerfile build/Dockerfile --format json\n  \
                      dockershrink optimize --backend ollama --model qwen2.5-coder:7b"
    )]
    Optimize(OptimizeArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct OptimizeArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the project root (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(
        short = 'd',
        long,
        value_name = "FILE",
        help = "Dockerfile to optimize (defaults to <PATH>/Dockerfile)"
    )]
    pub dockerfile: Option<PathBuf>,

    #[arg(
        short = 'p',
        long,
        value_name = "FILE",
        help = "package.json of the project (defaults to <PATH>/package.json)"
    )]
    pub package_json: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'b',
        long,
        value_parser = parse_adapter_kind,
        help = "LLM provider (overrides DOCKERSHRINK_PROVIDER)"
    )]
    pub backend: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name to use (provider-specific, e.g., 'gpt-4o-2024-11-20' for OpenAI)"
    )]
    pub model: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Timeout of a single LLM call in seconds (overrides DOCKERSHRINK_REQUEST_TIMEOUT)"
    )]
    pub timeout: Option<u64>,

    #[arg(
        long,
        value_name = "N",
        help = "Maximum number of LLM calls (overrides DOCKERSHRINK_MAX_LLM_CALLS)"
    )]
    pub max_llm_calls: Option<usize>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

impl OptimizeArgs {
    pub fn project_root(&self) -> PathBuf {
        self.project_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn dockerfile_path(&self, root: &Path) -> PathBuf {
        self.dockerfile
            .clone()
            .unwrap_or_else(|| root.join("Dockerfile"))
    }

    pub fn package_json_path(&self, root: &Path) -> PathBuf {
        self.package_json
            .clone()
            .unwrap_or_else(|| root.join("package.json"))
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Human,
    Json,
    Dockerfile,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => super::output::OutputFormat::Human,
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Dockerfile => super::output::OutputFormat::Dockerfile,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    parse_provider(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_optimize_args() {
        let args = CliArgs::parse_from(["dockershrink", "optimize"]);
        let Commands::Optimize(opts) = args.command;

        assert_eq!(opts.format, OutputFormatArg::Human);
        assert!(opts.backend.is_none());
        assert!(opts.timeout.is_none());
        assert!(opts.max_llm_calls.is_none());
        assert!(opts.project_path.is_none());
        assert_eq!(opts.project_root(), PathBuf::from("."));
        assert_eq!(
            opts.dockerfile_path(&opts.project_root()),
            PathBuf::from("./Dockerfile")
        );
    }

    #[test]
    fn test_optimize_with_paths() {
        let args = CliArgs::parse_from([
            "dockershrink",
            "optimize",
            "/tmp/app",
            "--dockerfile",
            "/tmp/app/docker/Dockerfile.prod",
        ]);
        let Commands::Optimize(opts) = args.command;
        let root = opts.project_root();

        assert_eq!(root, PathBuf::from("/tmp/app"));
        assert_eq!(
            opts.dockerfile_path(&root),
            PathBuf::from("/tmp/app/docker/Dockerfile.prod")
        );
        assert_eq!(
            opts.package_json_path(&root),
            PathBuf::from("/tmp/app/package.json")
        );
    }

    #[test]
    fn test_optimize_overrides() {
        let args = CliArgs::parse_from([
            "dockershrink",
            "optimize",
            "--backend",
            "ollama",
            "--model",
            "qwen2.5-coder:14b",
            "--timeout",
            "300",
            "--max-llm-calls",
            "8",
            "--format",
            "json",
        ]);
        let Commands::Optimize(opts) = args.command;

        assert_eq!(opts.backend, Some(AdapterKind::Ollama));
        assert_eq!(opts.model.as_deref(), Some("qwen2.5-coder:14b"));
        assert_eq!(opts.timeout, Some(300));
        assert_eq!(opts.max_llm_calls, Some(8));
        assert_eq!(opts.format, OutputFormatArg::Json);
    }

    #[test]
    fn test_invalid_backend_rejected() {
        let result = CliArgs::try_parse_from(["dockershrink", "optimize", "--backend", "mistral"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = CliArgs::try_parse_from(["dockershrink", "optimize", "-v", "-q"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_effective_log_level() {
        let args = CliArgs::parse_from(["dockershrink", "optimize", "-v"]);
        assert_eq!(args.effective_log_level(), Some("debug"));

        let args = CliArgs::parse_from(["dockershrink", "optimize", "-q"]);
        assert_eq!(args.effective_log_level(), Some("error"));

        let args = CliArgs::parse_from(["dockershrink", "-v", "--log-level", "trace", "optimize"]);
        assert_eq!(args.effective_log_level(), Some("trace"));

        let args = CliArgs::parse_from(["dockershrink", "optimize"]);
        assert_eq!(args.effective_log_level(), None);
    }
}
