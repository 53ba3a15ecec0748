//! Tracing setup for processes embedding the ACL console.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};

/// Crates whose events follow `log_level`. Everything else logs at `warn`.
const CONSOLE_TARGETS: &[&str] = &["chronik_console", "chronik_acl"];

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(log_level: &str) -> Result<EnvFilter> {
    let directives = CONSOLE_TARGETS
        .iter()
        .fold(String::from("warn"), |acc, target| format!("{acc},{target}={log_level}"));
    EnvFilter::try_new(&directives)
        .map_err(|e| ConsoleError::Config(format!("Invalid log_level '{log_level}': {e}")))
}

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over `config.log_level`. Returns `false` if a subscriber
/// was already installed, which is left in place.
pub fn init(config: &ConsoleConfig) -> Result<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => default_filter(&config.log_level)?,
    };

    Ok(fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_scopes_console_crates() {
        let filter = default_filter("debug").unwrap().to_string();
        assert!(filter.contains("chronik_console=debug"));
        assert!(filter.contains("chronik_acl=debug"));
    }

    #[test]
    fn test_default_filter_rejects_unknown_level() {
        let err = default_filter("loud").unwrap_err();
        assert!(matches!(err, ConsoleError::Config(ref msg) if msg.contains("'loud'")));
    }

    #[test]
    fn test_second_init_keeps_first_subscriber() {
        let config = ConsoleConfig::default();
        init(&config).unwrap();
        assert!(!init(&config).unwrap());
        tracing::info!("tracing initialized");
    }
}
