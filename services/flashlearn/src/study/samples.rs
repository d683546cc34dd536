//! services/flashlearn/src/study/samples.rs
//!
//! The built-in collection used to seed an empty store.

use chrono::NaiveDate;
use flashlearn_core::domain::{Flashcard, StudySet};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn cards(entries: &[(&str, &str, &str)]) -> Vec<Flashcard> {
    entries
        .iter()
        .map(|(id, term, definition)| Flashcard {
            id: id.to_string(),
            term: term.to_string(),
            definition: definition.to_string(),
        })
        .collect()
}

fn sample(
    id: &str,
    title: &str,
    description: &str,
    creator: &str,
    created_at: NaiveDate,
    updated_at: NaiveDate,
    cards: Vec<Flashcard>,
) -> StudySet {
    StudySet {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        cards,
        creator: creator.to_string(),
        created_at,
        updated_at,
        quest_config: None,
        difficulty: None,
        time_limit: None,
    }
}

pub fn sample_study_sets() -> Vec<StudySet> {
    vec![
        sample(
            "1",
            "Basic Spanish Vocabulary",
            "Common Spanish words and phrases for beginners",
            "Language Learner",
            date(2023, 9, 15),
            date(2023, 10, 5),
            cards(&[
                ("101", "Hola", "Hello"),
                ("102", "Adiós", "Goodbye"),
                ("103", "Por favor", "Please"),
                ("104", "Gracias", "Thank you"),
                ("105", "Lo siento", "I am sorry"),
            ]),
        ),
        sample(
            "2",
            "Biology 101: Cell Structure",
            "Key terms related to cell biology",
            "Science Student",
            date(2023, 8, 20),
            date(2023, 9, 12),
            cards(&[
                (
                    "201",
                    "Mitochondria",
                    "Powerhouse of the cell, responsible for cellular respiration",
                ),
                ("202", "Nucleus", "Control center of the cell containing genetic material"),
                ("203", "Ribosome", "Cellular structures where proteins are synthesized"),
                (
                    "204",
                    "Endoplasmic Reticulum",
                    "Network of membranes involved in protein and lipid synthesis",
                ),
                (
                    "205",
                    "Golgi Apparatus",
                    "Organelle that processes and packages proteins for secretion",
                ),
                (
                    "206",
                    "Lysosome",
                    "Digestive organelle containing enzymes to break down waste materials",
                ),
            ]),
        ),
        sample(
            "3",
            "JavaScript Fundamentals",
            "Essential JavaScript concepts for web development",
            "Web Dev Pro",
            date(2023, 7, 10),
            date(2023, 10, 1),
            cards(&[
                ("301", "Variable", "A container for storing data values"),
                ("302", "Function", "A block of code designed to perform a particular task"),
                ("303", "Array", "A special variable that can hold more than one value"),
                (
                    "304",
                    "Object",
                    "A container for properties, each property being a key-value pair",
                ),
                ("305", "DOM", "Document Object Model, a programming interface for web documents"),
                ("306", "Event Listener", "A procedure that waits for an event to occur"),
                (
                    "307",
                    "Callback Function",
                    "A function passed as an argument to another function",
                ),
            ]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_unique_and_studyable() {
        let sets = sample_study_sets();
        assert_eq!(sets.len(), 3);
        assert!(sets.iter().all(|set| set.is_studyable()));
        assert!(sets.iter().all(|set| set.updated_at >= set.created_at));

        let mut ids: Vec<_> = sets.iter().map(|set| set.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }
}
