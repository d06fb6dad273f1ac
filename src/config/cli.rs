//! Command-line argument definitions for cidtrack.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for cidtrack.
#[derive(Debug, Parser)]
#[command(name = "cidtrack")]
#[command(
    author,
    version,
    about = "Correlate live containers with the workloads that launched them"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Container engine socket path or URL.
    #[arg(long, global = true)]
    pub engine_socket: Option<String>,

    /// Deadline in seconds for engine calls.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List live containers.
    Ps,

    /// Show memory and CPU usage of a container.
    Stats(ContainerArgs),

    /// Kill a container.
    Kill(ContainerArgs),

    /// Resolve a live container ID from an ID file or glob.
    Resolve(ResolveArgs),

    /// Checkpoint, wait, then report containers that appeared meanwhile.
    New(NewArgs),
}

/// Arguments for subcommands addressing one container.
#[derive(Debug, Parser)]
pub struct ContainerArgs {
    /// Container ID.
    #[arg(required = true)]
    pub container_id: String,
}

/// Arguments for the `resolve` subcommand.
#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// ID file path or glob, relative to `--dir` unless absolute.
    #[arg(required = true)]
    pub path: Utf8PathBuf,

    /// Working directory for relative paths (defaults to the current one).
    #[arg(long)]
    pub dir: Option<Utf8PathBuf>,
}

/// Arguments for the `new` subcommand.
#[derive(Debug, Parser)]
pub struct NewArgs {
    /// Seconds to wait between the checkpoint and the diff.
    #[arg(long, default_value_t = 5)]
    pub wait_secs: u64,

    /// Report only the new container with this name.
    #[arg(long)]
    pub name: Option<String>,
}
