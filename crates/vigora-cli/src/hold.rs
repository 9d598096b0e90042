//! Timed pause used by `track_playback --pause-at`.

use std::future::Future;
use std::time::Duration;

use vigora_sim::SimulationDriver;

/// Pause `driver` for `hold`, then resume it.
///
/// If `interrupt` resolves first the playback is stopped instead and this
/// returns `false`.
pub async fn hold_then_resume<F>(driver: &mut SimulationDriver, hold: Duration, interrupt: F) -> bool
where
    F: Future,
{
    driver.pause();
    tokio::select! {
        _ = interrupt => {
            tracing::info!("Interrupted during hold, stopping playback");
            driver.stop();
            false
        }
        _ = tokio::time::sleep(hold) => {
            driver.start();
            true
        }
    }
}
