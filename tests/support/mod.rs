//! Scripted container runtime shared by the behavioural suites.

use std::sync::{Mutex, PoisonError};

use cidtrack::container::{Container, Stats};
use cidtrack::engine::{
    ContainerRuntime, ContainerStatsFuture, KillContainerFuture, ListContainersFuture,
};
use thiserror::Error;

/// Failure reported by [`ScriptedRuntime`].
#[derive(Debug, Error)]
pub enum ScriptedError {
    /// Listing was switched off with [`ScriptedRuntime::fail_listing`].
    #[error("engine unavailable")]
    Unavailable,
    /// No live container carries the requested ID.
    #[error("no such container: {0}")]
    NoSuchContainer(String),
}

#[derive(Debug, Default)]
struct Script {
    live: Vec<Container>,
    listing_fails: bool,
}

/// In-memory runtime whose live containers are edited by test steps.
#[derive(Debug, Default)]
pub struct ScriptedRuntime {
    script: Mutex<Script>,
}

impl ScriptedRuntime {
    fn with_script<T>(&self, edit: impl FnOnce(&mut Script) -> T) -> T {
        let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
        edit(&mut script)
    }

    /// Start a container with the given aliases.
    pub fn start(&self, id: &str, names: &[&str]) {
        let container = Container::new(id, names.iter().map(|name| String::from(*name)).collect());
        self.with_script(|script| script.live.push(container));
    }

    /// Remove a container without going through `kill_container`.
    pub fn stop(&self, id: &str) {
        self.with_script(|script| script.live.retain(|container| container.id != id));
    }

    /// Make every later listing fail.
    pub fn fail_listing(&self) {
        self.with_script(|script| script.listing_fails = true);
    }
}

impl ContainerRuntime for ScriptedRuntime {
    type Error = ScriptedError;

    fn list_containers(&self) -> ListContainersFuture<'_, ScriptedError> {
        let listing = self.with_script(|script| {
            if script.listing_fails {
                Err(ScriptedError::Unavailable)
            } else {
                Ok(script.live.clone())
            }
        });
        Box::pin(async move { listing })
    }

    fn container_stats(&self, container_id: &str) -> ContainerStatsFuture<'_, ScriptedError> {
        let known = self.with_script(|script| {
            script
                .live
                .iter()
                .any(|container| container.id == container_id)
        });
        let id = String::from(container_id);
        Box::pin(async move {
            if known {
                Ok(Stats {
                    memory_mb: 64,
                    cpu_sec: 1,
                })
            } else {
                Err(ScriptedError::NoSuchContainer(id))
            }
        })
    }

    fn kill_container(&self, container_id: &str) -> KillContainerFuture<'_, ScriptedError> {
        let removed = self.with_script(|script| {
            let before = script.live.len();
            script.live.retain(|container| container.id != container_id);
            script.live.len() < before
        });
        let id = String::from(container_id);
        Box::pin(async move {
            if removed {
                Ok(())
            } else {
                Err(ScriptedError::NoSuchContainer(id))
            }
        })
    }
}

/// Split a comma-separated step argument into trimmed, non-empty items.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
