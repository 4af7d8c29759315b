//! Service configuration from environment variables
//!
//! - `PORT` - TCP port to listen on (default 3000)
//! - `APP_VERSION` - Version label reported by every endpoint (default "v1")
//!
//! Unset and empty variables both fall back to the default.

use thiserror::Error;

/// Default listening port
pub const DEFAULT_PORT: u16 = 3000;

/// Default version label
pub const DEFAULT_VERSION: &str = "v1";

const PORT_VAR: &str = "PORT";
const VERSION_VAR: &str = "APP_VERSION";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid PORT value {value:?}: expected an integer between 0 and 65535")]
    InvalidPort { value: String },
}

/// Resolved service configuration
///
/// Fixed at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests pass a closure over a fixed map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match non_empty(lookup(PORT_VAR)) {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => return Err(ConfigError::InvalidPort { value: raw }),
            },
            None => DEFAULT_PORT,
        };

        let version =
            non_empty(lookup(VERSION_VAR)).unwrap_or_else(|| DEFAULT_VERSION.to_string());

        Ok(Self { port, version })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
