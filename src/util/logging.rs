//! Structured logging setup for dockershrink
//!
//! Logs go to stderr so that stdout carries only the optimization result.
//!
//! # Example
//!
//! ```no_run
//! use dockershrink::util::logging;
//! use tracing::{debug, info};
//!
//! // Reads DOCKERSHRINK_LOG_LEVEL, DOCKERSHRINK_LOG_JSON and RUST_LOG
//! logging::init_from_env();
//!
//! info!("Application started");
//! debug!(project = "my-app", "Reading project files");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Crates whose chatter is capped at `warn` unless `RUST_LOG` says otherwise
const NOISY_CRATES: &[&str] = &["h2", "hyper", "hyper_util", "reqwest", "genai"];

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level for dockershrink's own events
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., dockershrink::optimize) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    /// Include thread ID and name in logs
    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// # Example
    ///
    /// ```
    /// use dockershrink::util::LoggingConfig;
    /// use tracing::Level;
    ///
    /// let config = LoggingConfig::with_level(Level::DEBUG);
    /// assert_eq!(config.level, Level::DEBUG);
    /// ```
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with full metadata, for log collectors
    pub fn json() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    pub fn with_json(mut self, use_json: bool) -> Self {
        self.use_json = use_json;
        self
    }

    /// Builds the event filter: `RUST_LOG` first, then our own level
    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::from_default_env();

        if let Ok(directive) = format!("dockershrink={}", self.level).parse::<Directive>() {
            filter = filter.add_directive(directive);
        }

        if env::var("RUST_LOG").is_err() {
            for krate in NOISY_CRATES {
                if let Ok(directive) = format!("{}=warn", krate).parse::<Directive>() {
                    filter = filter.add_directive(directive);
                }
            }
        }

        filter
    }
}

/// Parses a log level from a string
///
/// Unknown names fall back to `Level::INFO`.
///
/// ```
/// use dockershrink::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("WARN"), Level::WARN);
/// assert_eq!(parse_level("loud"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Initializes the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.env_filter();
        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids)
            .with_thread_names(config.include_thread_ids);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Initializes logging from `DOCKERSHRINK_LOG_LEVEL`, `DOCKERSHRINK_LOG_JSON`
/// and `RUST_LOG`
pub fn init_from_env() {
    init_logging(config_from_env());
}

fn config_from_env() -> LoggingConfig {
    let level = env::var("DOCKERSHRINK_LOG_LEVEL")
        .map(|s| parse_level(&s))
        .unwrap_or(Level::INFO);

    LoggingConfig::with_level(level).with_json(json_from_env())
}

/// Whether `DOCKERSHRINK_LOG_JSON` asks for JSON output
pub fn json_from_env() -> bool {
    env::var("DOCKERSHRINK_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("warning"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_invalid() {
        assert_eq!(parse_level("invalid"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
        assert!(!config.include_location);
    }

    #[test]
    fn test_json_config() {
        let config = LoggingConfig::json();
        assert!(config.use_json);
        assert!(config.include_target);
        assert!(config.include_thread_ids);
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("DOCKERSHRINK_LOG_LEVEL", "debug");
        env::set_var("DOCKERSHRINK_LOG_JSON", "true");

        let config = config_from_env();

        env::remove_var("DOCKERSHRINK_LOG_LEVEL");
        env::remove_var("DOCKERSHRINK_LOG_JSON");

        assert_eq!(config.level, Level::DEBUG);
        assert!(config.use_json);
    }

    #[test]
    #[serial]
    fn test_json_from_env_ignores_garbage() {
        env::set_var("DOCKERSHRINK_LOG_JSON", "yes please");
        let use_json = json_from_env();
        env::remove_var("DOCKERSHRINK_LOG_JSON");

        assert!(!use_json);
    }
}
