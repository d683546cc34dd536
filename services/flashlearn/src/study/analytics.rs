//! services/flashlearn/src/study/analytics.rs
//!
//! The analytics channel shared by the store and the session controller.
//! Every emission is a "fire-and-forget" background task so navigation never waits
//! on the host. The tasks are tracked, so `flush` can drain them before shutdown.

use flashlearn_core::domain::{ActivityEnded, QuestConfig};
use flashlearn_core::gateway::{ProfileGateway, ACTIVITY_ENDED_EVENT, CONFIG_CHANGED_EVENT};
use serde::Serialize;
use std::future::Future;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, Default)]
pub struct Analytics {
    gateway: ProfileGateway,
    tasks: TaskTracker,
}

impl Analytics {
    pub fn new(gateway: ProfileGateway) -> Self {
        Self {
            gateway,
            tasks: TaskTracker::new(),
        }
    }

    pub fn gateway(&self) -> &ProfileGateway {
        &self.gateway
    }

    /// Reports a consumed quest configuration.
    pub fn config_changed(&self, config: &QuestConfig) {
        self.emit(CONFIG_CHANGED_EVENT, config);
    }

    /// Reports the end of a study session.
    pub fn activity_ended(&self, report: &ActivityEnded) {
        info!(
            "Session for set {} ended ({:?}): {} of {:?} cards, {}% complete.",
            report.set_id, report.reason, report.progress, report.card_count, report.completion
        );
        self.emit(ACTIVITY_ENDED_EVENT, report);
    }

    /// Runs host-bound work in the background, tracked until `flush`.
    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    /// Waits for every pending event and mirror write to reach the host.
    pub async fn flush(&self) {
        self.tasks.close();
        if !self.tasks.is_empty() {
            debug!("Waiting for {} background host calls.", self.tasks.len());
        }
        self.tasks.wait().await;
    }

    fn emit<T: Serialize>(&self, event_name: &'static str, payload: &T) {
        let payload = match serde_json::to_value(payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize '{}' payload: {}", event_name, e);
                return;
            }
        };

        let gateway = self.gateway.clone();
        self.spawn(async move {
            gateway.track_event(event_name, payload).await;
        });
    }
}
