//! services/flashlearn/src/study/create.rs
//!
//! Validation for user-authored study sets before they reach the store.

use chrono::Utc;
use flashlearn_core::domain::{Flashcard, NewStudySet, QuestCard};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;

/// User-authored sets need at least this many cards.
pub const MIN_CARDS: usize = 2;
pub const USER_CREATOR: &str = "You";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please add a title for your study set")]
    TitleRequired,
    #[error("A study set must have at least {min} cards (found {found})")]
    TooFewCards { min: usize, found: usize },
    #[error("Card {0} is missing a term or definition")]
    IncompleteCard(usize),
}

/// The contents of the create form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudySetDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub cards: Vec<QuestCard>,
}

impl StudySetDraft {
    /// Checks the draft and assigns card ids. Card numbers in errors are one-based.
    pub fn validate(self) -> Result<NewStudySet, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        if self.cards.len() < MIN_CARDS {
            return Err(ValidationError::TooFewCards {
                min: MIN_CARDS,
                found: self.cards.len(),
            });
        }
        if let Some(index) = self
            .cards
            .iter()
            .position(|card| card.term.trim().is_empty() || card.definition.trim().is_empty())
        {
            return Err(ValidationError::IncompleteCard(index + 1));
        }

        let mut rng = rand::thread_rng();
        let millis = Utc::now().timestamp_millis();
        let cards = self
            .cards
            .into_iter()
            .map(|card| Flashcard {
                id: format!("card-{}-{}", millis, random_suffix(&mut rng)),
                term: card.term,
                definition: card.definition,
            })
            .collect();

        Ok(NewStudySet {
            title: self.title,
            description: self.description,
            cards,
            creator: USER_CREATOR.to_string(),
            quest_config: None,
            difficulty: None,
            time_limit: None,
        })
    }
}

fn random_suffix<R: Rng>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(9)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect()
}
