//! Container engine connection and the runtime capability seam.
//!
//! The engine socket is resolved through a priority-based fallback chain:
//!
//! 1. CLI argument (`--engine-socket`)
//! 2. Config file (`engine_socket` in TOML)
//! 3. `CIDTRACK_ENGINE_SOCKET` environment variable
//! 4. `DOCKER_HOST` environment variable
//! 5. `CONTAINER_HOST` environment variable
//! 6. `PODMAN_HOST` environment variable
//! 7. Platform default (`/var/run/docker.sock` on Unix)
//!
//! The resulting `bollard::Docker` client implements [`ContainerRuntime`].

mod connection;
mod runtime;

pub use connection::{EngineConnector, SocketResolver};
pub use runtime::{
    ContainerRuntime, ContainerStatsFuture, KillContainerFuture, ListContainersFuture,
};
