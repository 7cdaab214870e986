use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskgate_core::{
    ControllerBuilder, ControllerHandle, ControllerSnapshot, DispatchConfig, Gate, QueueSnapshot,
    Task, Topology,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TopologyArg {
    Single,
    Dual,
    DynamicPool,
}

impl From<TopologyArg> for Topology {
    fn from(arg: TopologyArg) -> Self {
        match arg {
            TopologyArg::Single => Topology::Single,
            TopologyArg::Dual => Topology::Dual,
            TopologyArg::DynamicPool => Topology::DynamicPool,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "taskgate", version, about = "Submit tasks to a gated dispatcher and watch them settle")]
struct Cli {
    #[arg(long, value_enum, default_value = "single")]
    topology: TopologyArg,
    /// Number of tasks to submit.
    #[arg(long, default_value_t = 5)]
    tasks: usize,
    /// Queues to add before submitting (dynamic-pool only).
    #[arg(long = "extra-workers", default_value_t = 0)]
    extra_workers: usize,
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    /// Overrides the seed from the config file.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long = "tick-ms", default_value_t = 500)]
    tick_ms: u64,
}

#[derive(Serialize)]
struct Frame<'a> {
    controller: &'a ControllerSnapshot,
    queues: Vec<QueueSnapshot>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing()?;

    let mut config = match &args.config_path {
        Some(path) => load_config(path)?,
        None => DispatchConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let topology = Topology::from(args.topology);
    info!(?topology, tasks = args.tasks, seed = ?config.seed, "starting taskgate");

    let controller = ControllerBuilder::from_config(topology, &config)
        .context("invalid config")?
        .spawn();
    if controller.gate() == Gate::Closed {
        controller.toggle().context("open gate")?;
    }
    for _ in 0..args.extra_workers {
        controller.create_worker().context("create worker")?;
    }
    for n in 1..=args.tasks {
        let task = Task::new(n.to_string(), serde_json::json!({ "fileContent": "" }));
        controller.submit(task).context("submit task")?;
    }

    let mut ticker = interval(Duration::from_millis(args.tick_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let snapshot = controller.snapshot();
        print_frame(&controller, &snapshot).await?;

        let counts = snapshot.counts();
        if snapshot.status_table.len() == args.tasks && counts.settled() == args.tasks {
            info!(
                success = counts.success,
                failure = counts.failure,
                "all tasks settled"
            );
            break;
        }
    }

    Ok(())
}

async fn print_frame(controller: &ControllerHandle, snapshot: &ControllerSnapshot) -> Result<()> {
    let queues = controller
        .workers()
        .await
        .context("list workers")?
        .iter()
        .map(|w| w.snapshot())
        .collect();
    let frame = Frame {
        controller: snapshot,
        queues,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&frame).context("encode snapshot")?
    );
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: &Path) -> Result<DispatchConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    DispatchConfig::from_json_str(&raw).context("load config")
}
