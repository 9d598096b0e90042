//! Vigora Sim - drone track playback.
//!
//! [`SimulationEngine`] owns the transport state machine and the simulated
//! telemetry and advances only through explicit ticks. [`SimulationDriver`]
//! runs those ticks from a cancellable Tokio task, and [`TrackRegistry`]
//! keeps several independent playbacks keyed by drone id.

pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod registry;
pub mod snapshot;

pub use config::{PositionMode, SimulationConfig};
pub use driver::SimulationDriver;
pub use engine::{LoopToken, SimulationEngine, SimulationState};
pub use error::{SimError, SimResult};
pub use registry::TrackRegistry;
pub use snapshot::{MissionMetrics, SimulationSnapshot};
