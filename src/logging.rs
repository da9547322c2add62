//! # Structured Logging Module
//!
//! Environment-aware console logging for factory operations using the
//! tracing ecosystem. Output goes to stdout; set `LOG_FORMAT=json` for
//! machine-readable lines.
//!
//! Nothing in the crate requires a subscriber. Tests and embedding
//! applications opt in with [`init_console_only`] (or [`init_with_config`]),
//! which installs the global subscriber at most once per process.

use crate::config::{detect_environment, ObjectMotherConfig};
use chrono::Utc;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging with the environment's default level
pub fn init_console_only() {
    init_with_level(None);
}

/// Initialize console logging, honouring `config.log_level` when set
pub fn init_with_config(config: &ObjectMotherConfig) {
    init_with_level(config.log_level.as_deref());
}

fn init_with_level(level_override: Option<&str>) {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = level_override
            .map(str::to_lowercase)
            .unwrap_or_else(|| get_log_level(&environment));
        let json = std::env::var("LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        // Determine if we're in a TTY for ANSI color support
        let use_ansi = !json && IsTerminal::is_terminal(&std::io::stdout());

        let console_layer = if json {
            fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(EnvFilter::new(&log_level))
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(use_ansi)
                .with_filter(EnvFilter::new(&log_level))
                .boxed()
        };

        if tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        } else {
            tracing::info!(
                environment = %environment,
                log_level = %log_level,
                ansi_colors = use_ansi,
                json,
                "Console logging initialized"
            );
        }
    });
}

/// Get current environment from environment variables
pub fn get_environment() -> String {
    detect_environment()
}

/// Get log level based on environment variables or environment defaults
pub fn get_log_level(environment: &str) -> String {
    // First check for explicit LOG_LEVEL environment variable
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        return level.to_lowercase();
    }

    if let Ok(level) = std::env::var("RUST_LOG") {
        return level.to_lowercase();
    }

    match environment {
        "test" => "debug".to_string(),
        "development" => "debug".to_string(),
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for factory operations
pub fn log_factory_operation(
    operation: &str,
    prototype: Option<&str>,
    kind: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        prototype = prototype,
        kind = kind,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "🏭 FACTORY_OPERATION"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_console_only();
        init_console_only();
        init_with_config(&ObjectMotherConfig::default());

        log_factory_operation("declare", Some("wilma"), Some("user"), "ok", None);
    }

    #[test]
    fn test_environment_defaults_to_a_known_level() {
        let environment = get_environment();
        assert!(!environment.is_empty());
        assert!(!get_log_level(&environment).is_empty());
    }
}
