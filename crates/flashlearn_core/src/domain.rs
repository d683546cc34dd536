//! crates/flashlearn_core/src/domain.rs
//!
//! Defines the core data structures for the application: study sets, the
//! externally supplied quest configuration, the host user profile, the mirror
//! shape stored in the profile service and the completion report.
//!
//! Field names serialize in camelCase because the same JSON is shared with the
//! embedding host and the local cache.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

//=========================================================================================
// Study Sets
//=========================================================================================

/// A single term/definition pair. `id` is unique within its owning study set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A named, ordered collection of flashcards with provenance metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySet {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub cards: Vec<Flashcard>,
    pub creator: String,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest_config: Option<QuestConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Countdown length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
}

impl StudySet {
    /// A study set needs at least one card before a session can run over it.
    pub fn is_studyable(&self) -> bool {
        !self.cards.is_empty()
    }

    /// The reduced projection mirrored to the profile service: no generated ids, no creator.
    pub fn to_remote(&self) -> RemoteStudySet {
        RemoteStudySet {
            title: self.title.clone(),
            description: if self.description.is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
            cards: self
                .cards
                .iter()
                .map(|card| QuestCard {
                    term: card.term.clone(),
                    definition: card.definition.clone(),
                })
                .collect(),
            created_at: self.created_at.to_string(),
        }
    }
}

/// The caller-supplied part of a study set; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudySet {
    pub title: String,
    pub description: String,
    pub cards: Vec<Flashcard>,
    pub creator: String,
    pub quest_config: Option<QuestConfig>,
    pub difficulty: Option<Difficulty>,
    pub time_limit: Option<u32>,
}

//=========================================================================================
// Quest Configuration (external, ephemeral)
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestCard {
    pub term: String,
    pub definition: String,
}

/// Session configuration supplied by the embedding host. Carries no identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cards: Vec<QuestCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffled: Option<bool>,
}

//=========================================================================================
// User Profile
//=========================================================================================

/// The host's view of the current player. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl UserProfile {
    /// Stand-in identity used whenever the host cannot provide a profile.
    pub fn anonymous(now: DateTime<Utc>) -> Self {
        Self {
            id: format!("anonymous-{}", now.timestamp_millis()),
            name: Some("Guest User".to_string()),
            avatar: None,
            anonymous: true,
            verified: Some(false),
        }
    }
}

//=========================================================================================
// Profile Mirror Shape
//=========================================================================================

/// Value stored under the `userStudySets` profile property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStudySets {
    #[serde(default)]
    pub sets: BTreeMap<String, RemoteStudySet>,
}

impl UserStudySets {
    pub fn from_sets(sets: &[StudySet]) -> Self {
        Self {
            sets: sets
                .iter()
                .map(|set| (set.id.clone(), set.to_remote()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStudySet {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cards: Vec<QuestCard>,
    pub created_at: String,
}

impl RemoteStudySet {
    /// Rebuilds a full study set from a mirrored record.
    ///
    /// Card ids are synthesized as `{record_id}-card-{index}`. A `created_at` that is not a
    /// plain date (or an RFC 3339 timestamp) falls back to `today`.
    pub fn into_study_set(self, record_id: &str, creator: &str, today: NaiveDate) -> StudySet {
        let created_at = parse_date(&self.created_at).unwrap_or(today);
        let cards = self
            .cards
            .into_iter()
            .enumerate()
            .map(|(index, card)| Flashcard {
                id: format!("{}-card-{}", record_id, index),
                term: card.term,
                definition: card.definition,
            })
            .collect();

        StudySet {
            id: record_id.to_string(),
            title: self.title,
            description: self.description.unwrap_or_default(),
            cards,
            creator: creator.to_string(),
            created_at,
            updated_at: created_at,
            quest_config: None,
            difficulty: None,
            time_limit: None,
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|timestamp| timestamp.date_naive())
    })
}

//=========================================================================================
// Completion Report
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Finished,
    Timeout,
    UserExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportAction {
    End,
    Exit,
}

impl From<EndReason> for ReportAction {
    fn from(reason: EndReason) -> Self {
        match reason {
            EndReason::Finished | EndReason::Timeout => ReportAction::End,
            EndReason::UserExit => ReportAction::Exit,
        }
    }
}

/// The single terminal telemetry event describing how a study session ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEnded {
    pub action: ReportAction,
    pub set_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_count: Option<usize>,
    pub progress: usize,
    pub completion: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<u32>,
    pub reason: EndReason,
    pub timestamp: DateTime<Utc>,
}

/// Percentage of cards reached, rounded half away from zero. Zero cards yields 0.
pub fn completion_percent(progress: usize, card_count: usize) -> u32 {
    if card_count == 0 {
        return 0;
    }
    (100.0 * progress as f64 / card_count as f64).round() as u32
}
