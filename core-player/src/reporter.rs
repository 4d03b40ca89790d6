//! # Position Reporter
//!
//! Timer-driven task that snapshots the current track position at a fixed
//! cadence and fans it out as [`PlayerEvent::PositionChanged`]. Spawned by
//! `play`, aborted by `pause` and by the stop-completion handler; the resume
//! delay keeps the cadence consistent across a pause/resume cycle.

use crate::controller::Shared;
use crate::events::PlayerEvent;
use crate::traits::TrackPosition;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::trace;

/// Delay before the first tick when resuming from a pause.
///
/// The portion of the interval consumed before the pause still counts, so the
/// first tick after resuming fires after the remainder. A delta larger than
/// one interval (pause before any report, clock oddities) falls back to the
/// full interval.
pub(crate) fn resume_delay(interval: Duration, last_report: Instant, paused_at: Instant) -> Duration {
    let since_last_report = paused_at.saturating_duration_since(last_report);
    if since_last_report > interval {
        interval
    } else {
        interval - since_last_report
    }
}

/// Spawn the reporting task: one tick after `first_delay`, then one per
/// configured interval.
pub(crate) fn spawn(shared: Arc<Shared>, first_delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        time::sleep(first_delay).await;
        let mut ticker = time::interval(shared.config.report_interval);
        loop {
            ticker.tick().await;
            report_position(&shared).await;
        }
    })
}

async fn report_position(shared: &Shared) {
    let snapshot = {
        let mut state = shared.state.lock().await;
        if state.suppress_reports {
            None
        } else {
            match (state.track_id.clone(), state.decoder.clone()) {
                (Some(track_id), Some(decoder)) => {
                    state.last_report = Instant::now();
                    Some((
                        track_id,
                        TrackPosition::new(decoder.duration(), decoder.position()),
                    ))
                }
                _ => None,
            }
        }
    };

    // Emit after the guard is dropped; subscriber code must never run under
    // the state lock.
    if let Some((track_id, position)) = snapshot {
        trace!(
            track_id = %track_id,
            current_time_ms = position.current_time.as_millis() as u64,
            "position changed"
        );
        shared
            .events
            .emit(PlayerEvent::PositionChanged { track_id, position })
            .ok();
    }
}
