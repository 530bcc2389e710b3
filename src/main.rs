use dockershrink::cli::commands::{CliArgs, Commands};
use dockershrink::cli::handlers::handle_optimize;
use dockershrink::util::logging::{self, parse_level, LoggingConfig};
use dockershrink::{NAME, VERSION};

use clap::Parser;
use std::process;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Optimize(optimize_args) => handle_optimize(optimize_args, args.quiet).await,
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    match args.effective_log_level() {
        Some(level) => logging::init_logging(
            LoggingConfig::with_level(parse_level(level)).with_json(logging::json_from_env()),
        ),
        None => logging::init_from_env(),
    }
}
