//! Configuration data types for cidtrack.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Per-command deadline applied when `timeout_secs` is not configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Root application configuration.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `CIDTRACK_CONFIG_PATH` environment variable
/// 2. `.cidtrack.toml` in the current working directory
/// 3. `.cidtrack.toml` in the home directory
/// 4. `~/.config/cidtrack/config.toml` (XDG default)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "CIDTRACK",
    discovery(
        app_name = "cidtrack",
        env_var = "CIDTRACK_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".cidtrack.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// The container engine socket path or URL.
    pub engine_socket: Option<String>,

    /// Deadline in seconds for each command's engine calls.
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Reject values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `timeout_secs` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: String::from("timeout_secs"),
                reason: String::from("must be at least one second"),
            });
        }
        Ok(())
    }

    /// The deadline applied to each command, defaulting to
    /// [`DEFAULT_TIMEOUT_SECS`].
    #[must_use]
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
