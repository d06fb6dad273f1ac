//! Container runtime capability seam.
//!
//! The operator only needs three things from a container engine: list the
//! live containers, read one container's resource usage, and kill one
//! container. [`ContainerRuntime`] captures exactly that so correlation logic
//! can be exercised against scripted backends, while the `Bollard` adapter
//! below talks to a real Docker or Podman daemon.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bollard::Docker;
use bollard::models::{ContainerStatsResponse, ContainerSummary};
use bollard::query_parameters::{
    KillContainerOptionsBuilder, ListContainersOptionsBuilder, StatsOptionsBuilder,
};
use futures_util::TryStreamExt;

use crate::container::{Container, Stats};

/// Signal sent when killing a container through the engine.
const KILL_SIGNAL: &str = "SIGKILL";

/// cgroup v1 memory statistic holding resident set size in bytes.
const RSS_STAT_KEY: &str = "rss";

/// cgroup v2 memory statistic holding anonymous (resident) memory in bytes.
const ANON_STAT_KEY: &str = "anon";

/// Boxed future type returned by [`ContainerRuntime::list_containers`].
pub type ListContainersFuture<'a, E> =
    Pin<Box<dyn Future<Output = Result<Vec<Container>, E>> + Send + 'a>>;

/// Boxed future type returned by [`ContainerRuntime::container_stats`].
pub type ContainerStatsFuture<'a, E> = Pin<Box<dyn Future<Output = Result<Stats, E>> + Send + 'a>>;

/// Boxed future type returned by [`ContainerRuntime::kill_container`].
pub type KillContainerFuture<'a, E> = Pin<Box<dyn Future<Output = Result<(), E>> + Send + 'a>>;

/// Behaviour required to query and control containers in a backing engine.
pub trait ContainerRuntime {
    /// Native error type reported by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// List the currently live containers, in backend order.
    fn list_containers(&self) -> ListContainersFuture<'_, Self::Error>;

    /// Read a resource snapshot for the container with `container_id`.
    fn container_stats(&self, container_id: &str) -> ContainerStatsFuture<'_, Self::Error>;

    /// Terminate the container with `container_id`.
    fn kill_container(&self, container_id: &str) -> KillContainerFuture<'_, Self::Error>;
}

impl ContainerRuntime for Docker {
    type Error = bollard::errors::Error;

    fn list_containers(&self) -> ListContainersFuture<'_, Self::Error> {
        Box::pin(async move {
            let options = ListContainersOptionsBuilder::new().all(false).build();
            let summaries = Self::list_containers(self, Some(options)).await?;
            Ok(containers_from_summaries(summaries))
        })
    }

    fn container_stats(&self, container_id: &str) -> ContainerStatsFuture<'_, Self::Error> {
        let container_id_owned = String::from(container_id);

        Box::pin(async move {
            let options = StatsOptionsBuilder::new()
                .stream(false)
                .one_shot(true)
                .build();
            let mut samples = std::pin::pin!(Self::stats(self, &container_id_owned, Some(options)));
            let sample = samples.try_next().await?.ok_or_else(|| {
                bollard::errors::Error::DockerStreamError {
                    error: format!("no stats sample returned for container {container_id_owned}"),
                }
            })?;
            Ok(stats_from_response(&sample))
        })
    }

    fn kill_container(&self, container_id: &str) -> KillContainerFuture<'_, Self::Error> {
        let container_id_owned = String::from(container_id);

        Box::pin(async move {
            let options = KillContainerOptionsBuilder::new()
                .signal(KILL_SIGNAL)
                .build();
            Self::kill_container(self, &container_id_owned, Some(options)).await
        })
    }
}

/// Convert engine list summaries into container records.
///
/// Summaries without an identifier cannot be correlated and are dropped.
fn containers_from_summaries(summaries: Vec<ContainerSummary>) -> Vec<Container> {
    summaries
        .into_iter()
        .filter_map(|summary| {
            let Some(id) = summary.id.filter(|value| !value.is_empty()) else {
                tracing::debug!("skipping container summary without an id");
                return None;
            };
            Some(Container::new(id, summary.names.unwrap_or_default()))
        })
        .collect()
}

/// Reduce an engine stats sample to resident memory and cumulative CPU time.
///
/// Memory prefers the cgroup v1 `rss` statistic, then cgroup v2 `anon`. Total
/// usage, which counts page cache, is the last resort.
fn stats_from_response(response: &ContainerStatsResponse) -> Stats {
    let memory = response.memory_stats.as_ref();
    let detail = memory.and_then(|stats| stats.stats.as_ref());
    let memory_bytes = [RSS_STAT_KEY, ANON_STAT_KEY]
        .into_iter()
        .find_map(|key| detail.and_then(|values| values.get(key).copied()))
        .or_else(|| memory.and_then(|stats| stats.usage))
        .unwrap_or_default();

    let cpu_nanos = response
        .cpu_stats
        .as_ref()
        .and_then(|cpu| cpu.cpu_usage.as_ref())
        .and_then(|usage| usage.total_usage)
        .unwrap_or_default();

    Stats {
        // bytes to MiB
        memory_mb: memory_bytes >> 20,
        cpu_sec: Duration::from_nanos(cpu_nanos).as_secs(),
    }
}
