//! Semantic error types for cidtrack.
//!
//! Conditions a caller might inspect or retry are modelled as `thiserror`
//! enums. Opaque errors (`eyre::Report`) are reserved for the binary boundary.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised while connecting to the container engine.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Failed to connect to the container engine socket.
    #[error("failed to connect to container engine: {message}")]
    ConnectionFailed {
        /// A description of the connection failure.
        message: String,
    },

    /// The container engine socket was not found.
    #[error("container engine socket not found: {path}")]
    SocketNotFound {
        /// The path where the socket was expected.
        path: PathBuf,
    },

    /// Permission denied when accessing the container engine socket.
    #[error("permission denied accessing container socket: {path}")]
    PermissionDenied {
        /// The path to the socket.
        path: PathBuf,
    },

    /// Health check failed - engine did not respond correctly.
    #[error("container engine health check failed: {message}")]
    HealthCheckFailed {
        /// A description of the health check failure.
        message: String,
    },

    /// Health check timed out.
    #[error("container engine health check timed out after {seconds} seconds")]
    HealthCheckTimeout {
        /// The timeout duration in seconds.
        seconds: u64,
    },

    /// The async runtime used for blocking helpers could not be created.
    #[error("failed to create async runtime: {message}")]
    RuntimeCreationFailed {
        /// A description of the runtime failure.
        message: String,
    },
}

/// Errors produced by [`crate::operator::Operator`].
///
/// `E` is the native error type of the container runtime backing the
/// operator. Listing failures are wrapped with a fixed reason; stats and kill
/// failures are passed through unchanged as [`OperatorError::Backend`].
#[derive(Debug, Error)]
pub enum OperatorError<E>
where
    E: std::error::Error + 'static,
{
    /// The runtime could not enumerate containers.
    #[error("could not list the containers: {source}")]
    ListFailed {
        /// The runtime error that caused the failure.
        #[source]
        source: E,
    },

    /// A stats or kill request failed in the runtime.
    #[error(transparent)]
    Backend(E),

    /// An ID file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An ID file glob pattern is malformed.
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    /// The operation context was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// The operation context deadline elapsed.
    #[error("operation deadline exceeded")]
    DeadlineExceeded,
}

impl<E> OperatorError<E>
where
    E: std::error::Error + 'static,
{
    /// Returns whether the error came from cancellation or deadline expiry
    /// rather than from the runtime or filesystem.
    #[must_use]
    pub const fn is_interruption(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Operator error specialised to the `Bollard` engine client.
pub type EngineOperatorError = OperatorError<bollard::errors::Error>;

/// Top-level error type for cidtrack.
///
/// Aggregates the domain errors so the binary can convert them into
/// `eyre::Report` in one place.
#[derive(Debug, Error)]
pub enum CidtrackError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while connecting to the container engine.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// An error occurred while querying or controlling containers.
    #[error(transparent)]
    Operator(#[from] EngineOperatorError),
}

/// A specialised `Result` type for cidtrack operations.
pub type Result<T> = std::result::Result<T, CidtrackError>;
