//! Play several random drone tracks side by side.

use anyhow::Context;
use clap::Parser;
use std::time::Duration;
use tokio::time;

use vigora_cli::{format_snapshot, format_summary, init_tracing};
use vigora_core::{build_route_from_waypoints, demo_drone_seed, random_route, DroneTelemetry, GeoPosition};
use vigora_sim::{SimulationConfig, SimulationDriver, SimulationEngine, TrackRegistry};

/// Play back multiple drone tracks concurrently
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of drones
    #[arg(long, default_value_t = 3)]
    drones: usize,

    /// Center latitude for generated routes
    #[arg(long, default_value_t = 37.7749)]
    lat: f64,

    /// Center longitude for generated routes
    #[arg(long, default_value_t = -122.4194)]
    lon: f64,

    /// Waypoints per route
    #[arg(long, default_value_t = 5)]
    waypoints: usize,

    /// Max waypoint offset from the center, in degrees
    #[arg(long, default_value_t = 0.005)]
    radius: f64,

    /// Playback speed multiplier (0.5 - 10)
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Duration of a full run at 1x, in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Status print interval in seconds
    #[arg(long, default_value_t = 2.0)]
    status_secs: f64,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.json)?;
    anyhow::ensure!(args.drones > 0, "--drones must be at least 1");
    anyhow::ensure!(
        args.status_secs.is_finite() && args.status_secs > 0.0,
        "--status-secs must be a positive number"
    );
    anyhow::ensure!(
        args.radius.is_finite() && args.radius >= 0.0,
        "--radius must be a non-negative number of degrees"
    );

    let mut config = SimulationConfig::from_env();
    if let Some(ms) = args.duration_ms {
        config.route_duration = Duration::from_millis(ms.max(1));
    }

    let center = GeoPosition::new(args.lat, args.lon);
    let registry = TrackRegistry::new();

    for i in 0..args.drones {
        let drone_id = format!("DRONE{:03}", i + 1);
        let route = build_route_from_waypoints(&random_route(center, args.waypoints, args.radius));
        let seed = route.start().map(|wp| DroneTelemetry {
            position: wp.position,
            ..demo_drone_seed()
        });

        let driver = SimulationDriver::new(SimulationEngine::new(route, Vec::new(), seed, config.clone()));
        driver
            .set_speed(args.speed)
            .with_context(|| format!("invalid --speed for {}", drone_id))?;
        registry.insert(drone_id, driver);
    }

    println!("Starting {} tracks around ({}, {})", args.drones, args.lat, args.lon);
    registry.start_all();

    let mut ticker = time::interval(Duration::from_secs_f64(args.status_secs));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping all tracks");
                for id in registry.ids() {
                    registry.stop(&id)?;
                }
                break;
            }
            _ = ticker.tick() => {
                for (id, snapshot) in registry.snapshots() {
                    println!("{}", format_snapshot(&id, &snapshot));
                }
                if registry.all_idle() {
                    break;
                }
            }
        }
    }

    println!();
    for (id, snapshot) in registry.snapshots() {
        println!("{}", format_summary(&id, &snapshot));
    }
    Ok(())
}
