//! services/flashlearn/src/study/session.rs
//!
//! Drives a single study pass: card pointer, optional shuffle, optional countdown,
//! and exactly one completion report per ephemeral session.

use chrono::Utc;
use flashlearn_core::domain::{EndReason, Flashcard, QuestConfig, StudySet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::study::analytics::Analytics;
use crate::study::launch::{is_ephemeral_target, NavigationContext};
use crate::study::state::{SessionState, SessionView};
use crate::study::store::{StudySetStore, QUESTED_CREATOR};
use crate::study::timer::countdown_process;

const EPHEMERAL_TITLE: &str = "Quested Study Set";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The caller should redirect to the collection view.
    #[error("Study set not found: {0}")]
    NotFound(String),
    #[error("Study set {0} has no cards")]
    EmptyStudySet(String),
}

pub struct SessionController {
    session_state_lock: Arc<Mutex<SessionState>>,
    analytics: Analytics,
    cancellation_token: CancellationToken,
    timer_handle: Option<JoinHandle<()>>,
}

impl SessionController {
    /// Starts a session for `target_id`.
    ///
    /// An ephemeral id with a quest configuration in the navigation context builds an
    /// in-memory set from that configuration. Anything else is looked up in the store.
    pub fn start(
        target_id: &str,
        context: &NavigationContext,
        store: &StudySetStore,
    ) -> Result<Self, SessionError> {
        let analytics = store.analytics().clone();

        let ephemeral_config = context
            .quest_config
            .as_ref()
            .filter(|_| is_ephemeral_target(target_id));

        if let Some(config) = ephemeral_config {
            let study_set = ephemeral_study_set(target_id, config);
            let mut state = SessionState::new(study_set, true);
            if config.shuffled.unwrap_or(false) {
                state.shuffle(&mut rand::thread_rng());
            }
            info!("Starting ephemeral session {}.", target_id);
            return Self::from_state(state, analytics);
        }

        match store.get_study_set(target_id) {
            Some(study_set) => {
                info!("Starting session for study set {}.", target_id);
                Self::from_state(SessionState::new(study_set.clone(), false), analytics)
            }
            None => {
                warn!("Study set {} not found; redirecting to the dashboard.", target_id);
                Err(SessionError::NotFound(target_id.to_string()))
            }
        }
    }

    /// Wraps an initial state and starts its countdown when it has one.
    pub fn from_state(state: SessionState, analytics: Analytics) -> Result<Self, SessionError> {
        if !state.study_set.is_studyable() {
            return Err(SessionError::EmptyStudySet(state.study_set.id.clone()));
        }

        let countdown = state.countdown_running();
        let session_state_lock = Arc::new(Mutex::new(state));
        let cancellation_token = CancellationToken::new();

        let timer_handle = countdown.then(|| {
            tokio::spawn(countdown_process(
                session_state_lock.clone(),
                analytics.clone(),
                cancellation_token.clone(),
            ))
        });

        Ok(Self {
            session_state_lock,
            analytics,
            cancellation_token,
            timer_handle,
        })
    }

    /// Moves to the next card. Reaching (or sitting on) the last card of an ephemeral
    /// session completes it. Returns the new index.
    pub async fn advance(&self) -> usize {
        let mut session = self.session_state_lock.lock().await;
        let index = session.advance();
        if session.is_on_last_card() {
            if let Some(report) = session.finish(EndReason::Finished) {
                self.analytics.activity_ended(&report);
            }
        }
        index
    }

    /// Moves to the previous card. Never completes the session.
    pub async fn retreat(&self) -> usize {
        self.session_state_lock.lock().await.retreat()
    }

    /// Re-shuffles every card and returns to the first one.
    pub async fn shuffle(&self) {
        self.session_state_lock
            .lock()
            .await
            .shuffle(&mut rand::thread_rng());
    }

    pub async fn view(&self) -> SessionView {
        self.session_state_lock.lock().await.view()
    }

    /// User-initiated exit. An unfinished ephemeral session reports its progress.
    pub async fn exit(mut self) {
        self.teardown();
        let mut session = self.session_state_lock.lock().await;
        if let Some(report) = session.finish(EndReason::UserExit) {
            self.analytics.activity_ended(&report);
        }
        info!("Left study session {}.", session.study_set.id);
    }

    /// Stops the countdown. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.cancellation_token.cancel();
        if let Some(handle) = self.timer_handle.take() {
            handle.abort();
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn ephemeral_study_set(id: &str, config: &QuestConfig) -> StudySet {
    let today = Utc::now().date_naive();
    StudySet {
        id: id.to_string(),
        title: config
            .title
            .clone()
            .unwrap_or_else(|| EPHEMERAL_TITLE.to_string()),
        description: config.description.clone().unwrap_or_default(),
        cards: config
            .cards
            .iter()
            .enumerate()
            .map(|(index, card)| Flashcard {
                id: format!("card-{}", index),
                term: card.term.clone(),
                definition: card.definition.clone(),
            })
            .collect(),
        creator: QUESTED_CREATOR.to_string(),
        created_at: today,
        updated_at: today,
        quest_config: Some(config.clone()),
        difficulty: config.difficulty,
        time_limit: config.time_limit,
    }
}
