//! taskd - Main entry point

mod init;

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use taskd_api::ApiServer;
use taskd_foundation::TaskdConfig;
use taskd_task::{TaskManager, TaskManagerConfig};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// taskd - submit work, get an id, poll for the result
#[derive(Parser, Debug)]
#[command(name = "taskd")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(ClapArgs, Debug, Default, Clone)]
struct ServeArgs {
    /// Address to listen on (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Duration of each simulated work unit in milliseconds (overrides config)
    #[arg(long)]
    work_ms: Option<u64>,

    /// Read configuration from this file instead of the global/project files
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),
    /// Write a default .taskd/config.json in the current directory
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match args.command {
        Some(Command::Init { force }) => init::init_project(force),
        Some(Command::Serve(serve)) => serve_cmd(serve).await,
        None => serve_cmd(args.serve).await,
    }
}

/// Resolve configuration: file(s) first, then CLI overrides
fn resolve_config(args: &ServeArgs) -> anyhow::Result<TaskdConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let mut config = TaskdConfig::new();
            config.merge(TaskdConfig::load_from(path)?);
            config
        }
        None => TaskdConfig::load()?,
    };

    if let Some(bind) = &args.bind {
        config.bind_addr = Some(bind.clone());
    }
    if let Some(ms) = args.work_ms {
        config.work_duration_ms = Some(ms);
    }

    config.validate()?;
    Ok(config)
}

async fn serve_cmd(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    info!(
        "Work unit: {:?}, result {} byte(s)",
        config.work_duration(),
        config.resolved_work_result().len()
    );

    let manager = Arc::new(TaskManager::new(TaskManagerConfig::from(&config)));
    let server = ApiServer::bind(config.resolved_bind_addr(), manager).await?;

    server.run(shutdown_signal()).await?;
    info!("taskd stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, no longer accepting requests");
}
