//! Vigora CLI - headless track playback tools.
//!
//! - track_playback: play one route (demo or AI route plan) and print telemetry
//! - multi_track: play several random routes side by side

pub mod hold;
pub mod logging;
pub mod report;

pub use hold::hold_then_resume;
pub use logging::init_tracing;
pub use report::{format_snapshot, format_summary};
