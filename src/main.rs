//! `cidtrack` application entry point.
//!
//! Uses `eyre` for opaque error handling at the application boundary,
//! converting domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/cidtrack/config.toml` or path from `CIDTRACK_CONFIG_PATH`)
//! 3. Environment variables (`CIDTRACK_*`)
//! 4. Command-line arguments

use std::process::ExitCode;
use std::time::Duration;

use bollard::Docker;
use camino::Utf8PathBuf;
use cidtrack::config::{
    AppConfig, Cli, Commands, ContainerArgs, NewArgs, ResolveArgs, load_config,
};
use cidtrack::engine::{EngineConnector, SocketResolver};
use cidtrack::error::{EngineOperatorError, Result as CidtrackResult};
use cidtrack::operator::{OperationContext, Operator};
use clap::Parser;
use eyre::{Report, Result as EyreResult};
use mockable::DefaultEnv;

/// Application entry point.
///
/// Exits with status 1 when `resolve` finds no live container.
fn main() -> EyreResult<ExitCode> {
    // RUST_LOG takes precedence, fallback to warn.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli).map_err(Report::from)?;

    let runtime = EngineConnector::create_runtime().map_err(Report::from)?;
    runtime.block_on(run(&cli, &config)).map_err(Report::from)
}

/// Connect to the engine and execute the CLI command, returning
/// domain-specific errors.
async fn run(cli: &Cli, config: &AppConfig) -> CidtrackResult<ExitCode> {
    let env = DefaultEnv::new();
    let resolver = SocketResolver::new(&env);
    let docker = EngineConnector::connect_with_fallback_and_verify_async(
        config.engine_socket.as_deref(),
        &resolver,
    )
    .await?;

    let operator = Operator::new(docker);
    let root = OperationContext::new();
    cancel_on_ctrl_c(&root);
    let commands = CommandContext {
        operator: &operator,
        root: &root,
        timeout: config.operation_timeout(),
    };

    match &cli.command {
        Commands::Ps => commands.list_containers().await,
        Commands::Stats(args) => commands.show_stats(args).await,
        Commands::Kill(args) => commands.kill(args).await,
        Commands::Resolve(args) => commands.resolve(args).await,
        Commands::New(args) => commands.new_containers(args).await,
    }
}

/// Cancel `root` and every context derived from it on Ctrl-C.
fn cancel_on_ctrl_c(root: &OperationContext) {
    let canceller = root.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling");
            canceller.cancel();
        }
    });
}

struct CommandContext<'a> {
    operator: &'a Operator<Docker>,
    root: &'a OperationContext,
    timeout: Duration,
}

impl CommandContext<'_> {
    /// Context for one engine step, with its own deadline.
    fn step(&self) -> OperationContext {
        self.root.child().with_deadline_after(self.timeout)
    }

    #[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
    async fn list_containers(&self) -> CidtrackResult<ExitCode> {
        let containers = self.operator.current_containers(&self.step()).await?;
        for container in containers {
            println!("{}\t{}", container.id, container.names.join(","));
        }
        Ok(ExitCode::SUCCESS)
    }

    #[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
    async fn show_stats(&self, args: &ContainerArgs) -> CidtrackResult<ExitCode> {
        let stats = self
            .operator
            .container_stats(&self.step(), &args.container_id)
            .await?;
        println!("memory_mb={} cpu_sec={}", stats.memory_mb, stats.cpu_sec);
        Ok(ExitCode::SUCCESS)
    }

    async fn kill(&self, args: &ContainerArgs) -> CidtrackResult<ExitCode> {
        self.operator
            .kill_container(&self.step(), &args.container_id)
            .await?;
        tracing::info!(container_id = %args.container_id, "container killed");
        Ok(ExitCode::SUCCESS)
    }

    #[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
    async fn resolve(&self, args: &ResolveArgs) -> CidtrackResult<ExitCode> {
        let dir = match &args.dir {
            Some(dir) => dir.clone(),
            None => current_dir()?,
        };

        let resolved = self
            .operator
            .container_id_by_path(&self.step(), &args.path, &dir)
            .await?;
        match resolved {
            Some(container_id) => {
                println!("{container_id}");
                Ok(ExitCode::SUCCESS)
            }
            None => {
                tracing::info!(path = %args.path, "no live container for id file");
                Ok(ExitCode::FAILURE)
            }
        }
    }

    #[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
    async fn new_containers(&self, args: &NewArgs) -> CidtrackResult<ExitCode> {
        self.operator
            .remember_current_container_ids(&self.step())
            .await?;

        tokio::select! {
            () = self.root.token().cancelled() => {
                return Err(EngineOperatorError::Cancelled.into());
            }
            () = tokio::time::sleep(Duration::from_secs(args.wait_secs)) => {}
        }

        if let Some(ref name) = args.name {
            let found = self
                .operator
                .new_container_id_by_name(&self.step(), name)
                .await?;
            return Ok(found.map_or(ExitCode::FAILURE, |container_id| {
                println!("{container_id}");
                ExitCode::SUCCESS
            }));
        }

        for container_id in self.operator.new_container_ids(&self.step()).await? {
            println!("{container_id}");
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn current_dir() -> CidtrackResult<Utf8PathBuf> {
    let dir = std::env::current_dir().map_err(EngineOperatorError::from)?;
    Utf8PathBuf::try_from(dir)
        .map_err(|e| EngineOperatorError::from(e.into_io_error()).into())
}
