//! Play a drone track headlessly and print its telemetry.
//!
//! Uses the Riverside demo route unless a route plan file is given.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

use vigora_cli::{format_snapshot, format_summary, hold_then_resume, init_tracing};
use vigora_core::load_route_plan;
use vigora_sim::{PositionMode, SimulationConfig, SimulationDriver, SimulationEngine, SimulationState};

/// Play back a drone track (demo route or AI route plan)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Route plan JSON file (stored plan or provider response)
    #[arg(long)]
    route: Option<PathBuf>,

    /// Drone label shown in output
    #[arg(long, default_value = "DJI-422")]
    drone: String,

    /// Playback speed multiplier (0.5 - 10)
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Frame interval in milliseconds
    #[arg(long)]
    frame_ms: Option<u64>,

    /// Duration of a full run at 1x, in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Position interpolation: linear or offset
    #[arg(long)]
    position_mode: Option<PositionMode>,

    /// Pause once this fraction of the route is reached
    #[arg(long)]
    pause_at: Option<f64>,

    /// How long to hold the pause, in seconds
    #[arg(long, default_value_t = 2)]
    pause_secs: u64,

    /// Print every Nth frame
    #[arg(long, default_value_t = 30)]
    every: u64,

    /// Emit snapshots and logs as JSON
    #[arg(long)]
    json: bool,
}

fn build_engine(args: &Args, config: SimulationConfig) -> anyhow::Result<SimulationEngine> {
    let Some(path) = &args.route else {
        return Ok(SimulationEngine::demo(config));
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading route plan {}", path.display()))?;
    let plan = load_route_plan(&json).context("parsing route plan")?;
    SimulationEngine::from_route_plan(&plan, config)
        .with_context(|| format!("route plan {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.json)?;

    let mut config = SimulationConfig::from_env();
    if let Some(ms) = args.frame_ms {
        config.frame_interval = Duration::from_millis(ms.max(1));
    }
    if let Some(ms) = args.duration_ms {
        config.route_duration = Duration::from_millis(ms.max(1));
    }
    if let Some(mode) = args.position_mode {
        config.position_mode = mode;
    }

    let mut driver = SimulationDriver::new(build_engine(&args, config)?);
    driver.set_speed(args.speed).context("invalid --speed")?;

    let mut rx = driver.subscribe();
    driver.start();
    tracing::info!(drone = %args.drone, speed = args.speed, "Playback started");

    let every = args.every.max(1);
    let mut frames = 0u64;
    let mut paused_once = false;

    loop {
        let received = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping playback");
                driver.stop();
                break;
            }
            received = rx.recv() => received,
        };

        let snapshot = match received {
            Ok(snapshot) => snapshot,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Output lagging, skipped {} frames", skipped);
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        frames += 1;

        if args.json {
            println!("{}", serde_json::to_string(&snapshot)?);
        } else if frames % every == 0 || snapshot.state != SimulationState::Running {
            println!("{}", format_snapshot(&args.drone, &snapshot));
        }

        if snapshot.state == SimulationState::Completed {
            break;
        }

        if let Some(at) = args.pause_at {
            if !paused_once && snapshot.running && snapshot.progress >= at {
                paused_once = true;
                tracing::info!("Holding at {:.0}% for {}s", snapshot.progress * 100.0, args.pause_secs);
                let hold = Duration::from_secs(args.pause_secs);
                if !hold_then_resume(&mut driver, hold, tokio::signal::ctrl_c()).await {
                    break;
                }
            }
        }
    }

    println!("{}", format_summary(&args.drone, &driver.snapshot()));
    Ok(())
}
