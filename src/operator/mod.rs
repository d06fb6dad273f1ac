//! Correlation of live container runtime state with launched workloads.
//!
//! An [`Operator`] wraps one [`ContainerRuntime`] and remembers the IDs of
//! every container it has checkpointed. Later calls compare the runtime's
//! live state against that set to find containers that appeared since, or
//! resolve a container from the ID file written when it was created.
//!
//! Every query re-reads the runtime; nothing is cached between calls.
//!
//! ```ignore
//! use cidtrack::operator::{OperationContext, Operator};
//!
//! let operator = Operator::new(docker);
//! let ctx = OperationContext::with_timeout(Duration::from_secs(30));
//! operator.remember_current_container_ids(&ctx).await?;
//! // ... launch the workload ...
//! let id = operator.new_container_id_by_name(&ctx, "worker").await?;
//! ```

mod context;
mod id_file;

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

pub use context::OperationContext;
use context::Interruption;

use crate::container::{Container, Stats};
use crate::engine::ContainerRuntime;
use crate::error::OperatorError;

/// Result type for operator calls backed by the runtime `R`.
pub type OperatorResult<T, R> = Result<T, OperatorError<<R as ContainerRuntime>::Error>>;

/// Queries and controls containers through a runtime, remembering which
/// container IDs have been seen.
#[derive(Debug)]
pub struct Operator<R> {
    runtime: R,
    remembered: RwLock<HashSet<String>>,
}

impl<R: ContainerRuntime> Operator<R> {
    /// Create an operator with an empty remembered set.
    #[must_use]
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            remembered: RwLock::new(HashSet::new()),
        }
    }

    /// Return the runtime this operator queries.
    #[must_use]
    pub const fn runtime(&self) -> &R {
        &self.runtime
    }

    /// List the live containers in backend order.
    ///
    /// # Errors
    ///
    /// Returns `OperatorError::ListFailed` wrapping the runtime error, or
    /// `Cancelled` / `DeadlineExceeded` when `ctx` interrupts the call.
    pub async fn current_containers(
        &self,
        ctx: &OperationContext,
    ) -> OperatorResult<Vec<Container>, R> {
        ctx.run(self.runtime.list_containers())
            .await
            .map_err(Interruption::into_error)?
            .map_err(|source| OperatorError::ListFailed { source })
    }

    /// Read memory and CPU usage for the container with `container_id`.
    ///
    /// # Errors
    ///
    /// Returns `OperatorError::Backend` carrying the runtime error unchanged,
    /// or `Cancelled` / `DeadlineExceeded` when `ctx` interrupts the call.
    pub async fn container_stats(
        &self,
        ctx: &OperationContext,
        container_id: &str,
    ) -> OperatorResult<Stats, R> {
        ctx.run(self.runtime.container_stats(container_id))
            .await
            .map_err(Interruption::into_error)?
            .map_err(OperatorError::Backend)
    }

    /// Kill the container with `container_id`.
    ///
    /// The container disappears from later listings once the runtime has
    /// processed the kill.
    ///
    /// # Errors
    ///
    /// Returns `OperatorError::Backend` carrying the runtime error unchanged,
    /// or `Cancelled` / `DeadlineExceeded` when `ctx` interrupts the call.
    pub async fn kill_container(
        &self,
        ctx: &OperationContext,
        container_id: &str,
    ) -> OperatorResult<(), R> {
        ctx.run(self.runtime.kill_container(container_id))
            .await
            .map_err(Interruption::into_error)?
            .map_err(OperatorError::Backend)?;
        tracing::debug!(container_id, "container killed");
        Ok(())
    }

    /// Add the IDs of all live containers to the remembered set.
    ///
    /// The set only grows: containers that have since gone away stay
    /// remembered.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::current_containers`].
    pub async fn remember_current_container_ids(
        &self,
        ctx: &OperationContext,
    ) -> OperatorResult<(), R> {
        let containers = self.current_containers(ctx).await?;

        let mut remembered = self
            .remembered
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        remembered.extend(containers.into_iter().map(|container| container.id));
        tracing::debug!(count = remembered.len(), "remembered container ids");
        Ok(())
    }

    /// Live containers whose IDs are not remembered, in backend order.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::current_containers`].
    pub async fn new_containers(
        &self,
        ctx: &OperationContext,
    ) -> OperatorResult<Vec<Container>, R> {
        let containers = self.current_containers(ctx).await?;

        let remembered = self
            .remembered
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let fresh: Vec<Container> = containers
            .into_iter()
            .filter(|container| !remembered.contains(&container.id))
            .collect();
        tracing::debug!(count = fresh.len(), "found new containers");
        Ok(fresh)
    }

    /// IDs of [`Self::new_containers`], in the same order.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::current_containers`].
    pub async fn new_container_ids(
        &self,
        ctx: &OperationContext,
    ) -> OperatorResult<Vec<String>, R> {
        let fresh = self.new_containers(ctx).await?;
        Ok(fresh.into_iter().map(|container| container.id).collect())
    }

    /// ID of the first new container with an alias equal to `name`.
    ///
    /// A single leading `/` is ignored on each alias. Returns `Ok(None)` when
    /// no new container carries the name.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::current_containers`].
    pub async fn new_container_id_by_name(
        &self,
        ctx: &OperationContext,
        name: &str,
    ) -> OperatorResult<Option<String>, R> {
        let fresh = self.new_containers(ctx).await?;
        Ok(fresh
            .into_iter()
            .find(|container| container.has_name(name))
            .map(|container| container.id))
    }

    /// Sorted snapshot of every remembered container ID.
    #[must_use]
    pub fn remembered_ids(&self) -> Vec<String> {
        let remembered = self
            .remembered
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<String> = remembered.iter().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns whether `container_id` is one of the live containers.
    async fn is_live(
        &self,
        ctx: &OperationContext,
        container_id: &str,
    ) -> OperatorResult<bool, R> {
        let containers = self.current_containers(ctx).await?;
        Ok(containers
            .iter()
            .any(|container| container.id == container_id))
    }
}
