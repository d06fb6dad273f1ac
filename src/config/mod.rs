//! Configuration system for cidtrack.
//!
//! Configuration is merged by `ortho_config` with the precedence (lowest to
//! highest): defaults, configuration file, environment variables, CLI flags.
//!
//! The configuration file is expected at `~/.config/cidtrack/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! engine_socket = "unix:///run/user/1000/podman/podman.sock"
//! timeout_secs = 10
//! ```

mod cli;
mod loader;
mod types;


pub use cli::{Cli, Commands, ContainerArgs, NewArgs, ResolveArgs};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub use types::{AppConfig, DEFAULT_TIMEOUT_SECS};
