//! Configuration loading with layered precedence.
//!
//! Layers are composed by hand with `MergeComposer` rather than through the
//! derived `load()`: the `Cli` struct owns subcommand dispatch, and typed
//! environment values must fail fast instead of being silently ignored.
//!
//! String fields (e.g. `CIDTRACK_ENGINE_SOCKET`) are always accepted. Typed
//! fields such as `CIDTRACK_TIMEOUT_SECS` must parse or loading fails with a
//! clear error.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::{DefaultEnv, Env};
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Unsigned 64-bit integer. Invalid values return an error.
    U64,
}

/// Mapping of one environment variable onto a config field.
struct EnvVarSpec {
    env_var: &'static str,
    field: &'static str,
    var_type: EnvVarType,
}

const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "CIDTRACK_ENGINE_SOCKET",
        field: "engine_socket",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "CIDTRACK_TIMEOUT_SECS",
        field: "timeout_secs",
        var_type: EnvVarType::U64,
    },
];

/// Environment variable naming an explicit configuration file.
const CONFIG_PATH_ENV_VAR: &str = "CIDTRACK_CONFIG_PATH";

/// Returns the environment variable names recognised by the config loader,
/// including `CIDTRACK_CONFIG_PATH`.
///
/// Tests use this to clear every `CIDTRACK_*` variable without keeping a
/// separate list in sync.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS
        .iter()
        .map(|spec| spec.env_var)
        .chain(std::iter::once(CONFIG_PATH_ENV_VAR))
        .collect()
}

/// Load a configuration file and push it to the composer.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Load configuration from the process environment with full layer
/// precedence.
///
/// # Errors
///
/// Returns `ConfigError` if a configuration file is malformed, a typed
/// environment value does not parse, or the merged values fail validation.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &DefaultEnv::new())
}

/// Load configuration reading environment variables through `env`.
///
/// Layers, lowest to highest: defaults, configuration file (the `--config`
/// path if it exists, otherwise discovery), `CIDTRACK_*` environment
/// variables, CLI flags.
///
/// # Errors
///
/// Returns `ConfigError` if a configuration file is malformed, a typed
/// environment value does not parse, or the merged values fail validation.
pub fn load_config_with_env<E: Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    let config_path = cli
        .config
        .clone()
        .filter(|path| path.exists())
        .or_else(|| discover_config_file(env));
    if let Some(ref path) = config_path {
        tracing::debug!(path = %path, "loading configuration file");
        load_config_file(path, &mut composer)?;
    }

    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    config.validate()?;
    Ok(config)
}

/// Find the first existing configuration file candidate.
fn discover_config_file<E: Env>(env: &E) -> Option<Utf8PathBuf> {
    if let Some(explicit) = env
        .string(CONFIG_PATH_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(Utf8PathBuf::from)
        .filter(|path| path.exists())
    {
        return Some(explicit);
    }

    let discovery = ConfigDiscovery::builder("cidtrack")
        .config_file_name("config.toml")
        .dotfile_name(".cidtrack.toml")
        .build();
    discovery
        .candidates()
        .into_iter()
        .filter(|path| path.exists())
        .find_map(|path| Utf8PathBuf::try_from(path).ok())
}

/// Collect `CIDTRACK_*` environment variables into a JSON object.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed variable does not parse.
fn collect_env_vars<E: Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };

        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::U64 => match raw_value.trim().parse::<u64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected unsigned integer, got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };

        root.insert(spec.field.to_owned(), json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref socket) = cli.engine_socket {
        overrides.insert("engine_socket".to_owned(), Value::String(socket.clone()));
    }

    if let Some(timeout) = cli.timeout_secs {
        overrides.insert("timeout_secs".to_owned(), Value::Number(timeout.into()));
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
