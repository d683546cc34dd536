//! services/flashlearn/src/study/state.rs
//!
//! The state of a single study pass. It is created when a study route is entered,
//! mutated by navigation, shuffling and timer ticks, and dropped when the route is left.

use chrono::Utc;
use flashlearn_core::domain::{
    completion_percent, ActivityEnded, EndReason, Flashcard, ReportAction, StudySet,
};
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Completed,
}

/// The state for one active study session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub study_set: StudySet,
    pub current_index: usize,
    /// Seconds left on the countdown, `None` when the set has no time limit.
    pub time_left: Option<u32>,
    pub is_ephemeral: bool,
    pub completed: bool,
}

impl SessionState {
    pub fn new(study_set: StudySet, is_ephemeral: bool) -> Self {
        let time_left = study_set.time_limit.filter(|limit| *limit > 0);
        Self {
            study_set,
            current_index: 0,
            time_left,
            is_ephemeral,
            completed: false,
        }
    }

    pub fn card_count(&self) -> usize {
        self.study_set.cards.len()
    }

    pub fn is_on_last_card(&self) -> bool {
        self.current_index + 1 >= self.card_count()
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.study_set.cards.get(self.current_index)
    }

    pub fn phase(&self) -> SessionPhase {
        if self.completed {
            SessionPhase::Completed
        } else {
            SessionPhase::Active
        }
    }

    /// Moves forward one card; a no-op on the last card. Returns the new index.
    pub fn advance(&mut self) -> usize {
        if !self.is_on_last_card() {
            self.current_index += 1;
        }
        self.current_index
    }

    /// Moves back one card; a no-op on the first card. Returns the new index.
    pub fn retreat(&mut self) -> usize {
        self.current_index = self.current_index.saturating_sub(1);
        self.current_index
    }

    /// Re-permutes every card uniformly at random and returns to the first card.
    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.study_set.cards.shuffle(rng);
        self.current_index = 0;
    }

    /// Decrements the countdown by one second. Returns `true` on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        match self.time_left {
            Some(left) if left > 0 => {
                self.time_left = Some(left - 1);
                left == 1
            }
            _ => false,
        }
    }

    pub fn countdown_running(&self) -> bool {
        matches!(self.time_left, Some(left) if left > 0)
    }

    /// Marks the session completed and builds its report.
    ///
    /// Only ephemeral sessions report, and only once: every later call returns `None`.
    pub fn finish(&mut self, reason: EndReason) -> Option<ActivityEnded> {
        if !self.is_ephemeral || self.completed {
            return None;
        }
        self.completed = true;
        Some(self.report(reason))
    }

    fn report(&self, reason: EndReason) -> ActivityEnded {
        let card_count = self.card_count();
        let progress = self.current_index + 1;
        ActivityEnded {
            action: ReportAction::from(reason),
            set_id: self.study_set.id.clone(),
            title: Some(self.study_set.title.clone()),
            card_count: Some(card_count),
            progress,
            completion: completion_percent(progress, card_count),
            time_remaining: self.time_left,
            reason,
            timestamp: Utc::now(),
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            set_id: self.study_set.id.clone(),
            title: self.study_set.title.clone(),
            current_card: self.current_card().cloned(),
            position: self.current_index + 1,
            card_count: self.card_count(),
            time_left: self.time_left,
            phase: self.phase(),
            is_ephemeral: self.is_ephemeral,
        }
    }
}

/// A read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub set_id: String,
    pub title: String,
    pub current_card: Option<Flashcard>,
    /// One-based position of the current card.
    pub position: usize,
    pub card_count: usize,
    pub time_left: Option<u32>,
    pub phase: SessionPhase,
    pub is_ephemeral: bool,
}

impl SessionView {
    pub fn position_label(&self) -> String {
        format!("Card {} of {}", self.position, self.card_count)
    }
}
