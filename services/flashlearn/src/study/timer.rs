//! services/flashlearn/src/study/timer.rs
//!
//! The countdown "worker" for timed sessions. It ticks once per second, reports a
//! timeout when the clock reaches zero, and stops as soon as its `CancellationToken`
//! fires.

use flashlearn_core::domain::EndReason;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::study::analytics::Analytics;
use crate::study::state::SessionState;

pub const TICK: Duration = Duration::from_secs(1);

/// Runs until the countdown reaches zero or the owning session is torn down.
pub async fn countdown_process(
    session_state_lock: Arc<Mutex<SessionState>>,
    analytics: Analytics,
    cancellation_token: CancellationToken,
) {
    let mut interval = interval_at(Instant::now() + TICK, TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => {
                debug!("Countdown cancelled.");
                return;
            }
            _ = interval.tick() => {}
        }

        let mut session = session_state_lock.lock().await;
        if session.tick() {
            info!("Countdown for set {} reached zero.", session.study_set.id);
            if let Some(report) = session.finish(EndReason::Timeout) {
                analytics.activity_ended(&report);
            }
            return;
        }
        if !session.countdown_running() {
            return;
        }
    }
}
