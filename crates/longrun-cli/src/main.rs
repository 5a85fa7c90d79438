use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::time::{Instant, sleep};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use longrun_core::app::{StatusCounts, TaskResultView, TaskStatusView};
use longrun_core::{Config, TaskId, TaskManager, TaskManagerBuilder, TaskStatus};

#[derive(Debug, Parser)]
#[command(
    name = "longrun",
    version,
    about = "Drive the long-running task core from the command line"
)]
struct Args {
    /// TOML config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override engine.ticks
    #[arg(long, global = true)]
    ticks: Option<u32>,

    /// Override engine.tick_interval_ms
    #[arg(long, global = true)]
    tick_interval_ms: Option<u64>,

    /// Verbose logging (RUST_LOG still wins)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create tasks, optionally cancel/delete some, wait and report.
    Run {
        /// Number of tasks to create
        #[arg(long, default_value_t = 3)]
        tasks: usize,

        /// Cancel this many of the created tasks right away
        #[arg(long, default_value_t = 0)]
        cancel: usize,

        /// Delete this many of the remaining tasks after one tick
        #[arg(long, default_value_t = 0)]
        delete: usize,

        /// Only list tasks with this status at the end (e.g. SUCCESS)
        #[arg(long)]
        status: Option<TaskStatus>,
    },

    /// Print the health payload.
    Health,

    /// Print the effective configuration.
    Config,
}

/// Calling-layer event printed as one JSON line.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    Created { task_id: &'a TaskId },
    Cancelled { task_id: &'a TaskId, changed: bool },
    Deleted { task_id: &'a TaskId, existed: bool },
    Result(&'a TaskResultView),
    NotFound { task_id: &'a TaskId },
    Listed { tasks: Vec<TaskStatusView> },
    Counts(&'a StatusCounts),
}

fn emit(event: &Event<'_>) -> Result<()> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(ticks) = args.ticks {
        config.engine.ticks = ticks;
    }
    if let Some(ms) = args.tick_interval_ms {
        config.engine.tick_interval_ms = ms;
    }
    config.validate()?;
    Ok(config)
}

/// Poll until the task is terminal or gone, giving up at `timeout`.
async fn wait_for_task(
    manager: &TaskManager,
    task_id: &TaskId,
    poll: Duration,
    timeout: Duration,
) -> Result<Option<TaskResultView>> {
    // 遠すぎる deadline は「待ち続ける」扱い
    let deadline = Instant::now().checked_add(timeout);
    loop {
        let view = match manager.result(task_id).await {
            Ok(view) => view,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if view.status.is_terminal() {
            return Ok(Some(view));
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            warn!(task_id = %task_id, status = %view.status, "gave up waiting");
            return Ok(Some(view));
        }
        sleep(poll).await;
    }
}

async fn run(
    manager: &TaskManager,
    config: &Config,
    tasks: usize,
    cancel: usize,
    delete: usize,
    status: Option<TaskStatus>,
) -> Result<()> {
    let mut ids = Vec::with_capacity(tasks);
    for _ in 0..tasks {
        let task_id = manager.create().await?;
        emit(&Event::Created { task_id: &task_id })?;
        ids.push(task_id);
    }

    for task_id in ids.iter().take(cancel) {
        let changed = manager.cancel(task_id).await?;
        emit(&Event::Cancelled { task_id, changed })?;
    }

    if delete > 0 {
        sleep(config.engine.tick_interval()).await;
        for task_id in ids.iter().skip(cancel).take(delete) {
            let existed = manager.delete(task_id).await?;
            emit(&Event::Deleted { task_id, existed })?;
        }
    }

    let poll = config.engine.tick_interval() / 2;
    let timeout = config
        .engine
        .run_duration()
        .saturating_add(config.engine.tick_interval().saturating_mul(2));
    for task_id in &ids {
        match wait_for_task(manager, task_id, poll, timeout).await? {
            Some(view) => emit(&Event::Result(&view))?,
            None => emit(&Event::NotFound { task_id })?,
        }
    }

    let listed = manager
        .list(status)
        .await?
        .iter()
        .map(TaskStatusView::from)
        .collect();
    emit(&Event::Listed { tasks: listed })?;
    emit(&Event::Counts(&manager.counts().await?))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let config = load_config(&args)?;
    info!(
        ticks = config.engine.ticks,
        tick_interval_ms = config.engine.tick_interval_ms,
        "starting"
    );
    let manager = TaskManagerBuilder::from_config(&config).build();

    match args.command {
        Command::Run {
            tasks,
            cancel,
            delete,
            status,
        } => run(&manager, &config, tasks, cancel, delete, status).await?,
        Command::Health => println!("{}", serde_json::to_string(&manager.service_info())?),
        Command::Config => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}
