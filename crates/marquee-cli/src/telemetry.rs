//! Logging setup for the CLI.
//!
//! # Design
//! - One entry point installs either a pretty or a JSON `fmt` layer.
//! - Logs go to stderr so command output on stdout stays machine-readable.
//! - The build SHA is recorded once and reused in the HTTP user agent.

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when neither `MARQUEE_LOG` nor `RUST_LOG` is set.
pub(crate) const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_ENV: &str = "MARQUEE_LOG";

static BUILD_SHA: OnceCell<String> = OnceCell::new();

/// Logging configuration.
#[derive(Debug, Clone)]
pub(crate) struct LoggingConfig<'a> {
    pub(crate) level: &'a str,
    pub(crate) format: LogFormat,
    pub(crate) build_sha: &'a str,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::Pretty,
            build_sha: option_env!("MARQUEE_BUILD_SHA").unwrap_or("dev"),
        }
    }
}

/// Output formats for the logger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    /// Structured JSON objects, one per line.
    Json,
    /// Human-readable lines.
    #[default]
    Pretty,
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub(crate) fn init_logging(config: &LoggingConfig) -> Result<()> {
    BUILD_SHA.set(config.build_sha.to_string()).ok();

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(build_env_filter(config.level))
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false),
            )
            .try_init()
            .map_err(|err| anyhow!("failed to install tracing subscriber: {err}")),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(build_env_filter(config.level))
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false),
            )
            .try_init()
            .map_err(|err| anyhow!("failed to install tracing subscriber: {err}")),
    }
}

/// Build SHA recorded by [`init_logging`], or `dev`.
pub(crate) fn build_sha() -> &'static str {
    BUILD_SHA.get().map_or("dev", String::as_str)
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_installs_subscriber_once() {
        let config = LoggingConfig {
            level: "debug",
            format: LogFormat::Json,
            build_sha: "abc1234",
        };
        init_logging(&config).expect("first install succeeds");
        assert!(init_logging(&config).is_err());
        assert_eq!(build_sha(), "abc1234");
    }
}
