pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, OptimizeArgs};
pub use output::{OutputFormat, OutputFormatter};
