//! services/flashlearn/src/console.rs
//!
//! A line-driven front end over the store and the session controller. Each command
//! produces the lines to print; the binary owns stdin/stdout.

use flashlearn_core::domain::{QuestConfig, StudySet};
use tracing::warn;

use crate::study::{
    Navigation, NavigationContext, Route, SessionController, SessionError, SessionPhase,
    SessionView, StudySetDraft, StudySetStore,
};

/// Number of sets shown by `recent`.
pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Recent,
    Study(String),
    Next,
    Prev,
    Shuffle,
    Status,
    Exit,
    Import(String),
    Create(String),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word {
            "list" | "ls" => Command::List,
            "recent" => Command::Recent,
            "study" if !rest.is_empty() => Command::Study(rest.to_string()),
            "study" => return Err("usage: study <id>".to_string()),
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "shuffle" => Command::Shuffle,
            "status" => Command::Status,
            "exit" => Command::Exit,
            "import" if !rest.is_empty() => Command::Import(rest.to_string()),
            "import" => return Err("usage: import <quest-config-json>".to_string()),
            "create" if !rest.is_empty() => Command::Create(rest.to_string()),
            "create" => return Err("usage: create <study-set-json>".to_string()),
            "help" | "?" => Command::Help,
            "quit" | "q" => Command::Quit,
            other => return Err(format!("unknown command '{}' (try 'help')", other)),
        };
        Ok(command)
    }
}

pub struct Console {
    store: StudySetStore,
    session: Option<SessionController>,
}

impl Console {
    pub fn new(store: StudySetStore) -> Self {
        Self {
            store,
            session: None,
        }
    }

    pub fn store(&self) -> &StudySetStore {
        &self.store
    }

    pub fn in_session(&self) -> bool {
        self.session.is_some()
    }

    /// Applies a navigation, tearing down any session on the route being left.
    pub async fn navigate(&mut self, navigation: Navigation) -> Vec<String> {
        if let Some(mut previous) = self.session.take() {
            previous.teardown();
        }

        match navigation.route {
            Route::Dashboard => self.list(self.store.study_sets()),
            Route::Create => vec!["Use: create {\"title\": ..., \"cards\": [...]}".to_string()],
            Route::Study(id) => self.start_session(&id, &navigation.context).await,
            Route::NotFound(path) => vec![format!("Page not found: {}", path)],
        }
    }

    pub async fn execute(&mut self, command: Command) -> Vec<String> {
        match command {
            Command::List => self.list(self.store.study_sets()),
            Command::Recent => self.list(self.store.recent(RECENT_LIMIT)),
            Command::Study(id) => {
                self.navigate(Navigation {
                    route: Route::Study(id),
                    context: NavigationContext::default(),
                })
                .await
            }
            Command::Next => match &self.session {
                Some(session) => {
                    session.advance().await;
                    render(&session.view().await)
                }
                None => no_session(),
            },
            Command::Prev => match &self.session {
                Some(session) => {
                    session.retreat().await;
                    render(&session.view().await)
                }
                None => no_session(),
            },
            Command::Shuffle => match &self.session {
                Some(session) => {
                    session.shuffle().await;
                    let mut lines = vec!["Cards shuffled.".to_string()];
                    lines.extend(render(&session.view().await));
                    lines
                }
                None => no_session(),
            },
            Command::Status => match &self.session {
                Some(session) => render(&session.view().await),
                None => no_session(),
            },
            Command::Exit => match self.session.take() {
                Some(session) => {
                    session.exit().await;
                    self.list(self.store.study_sets())
                }
                None => no_session(),
            },
            Command::Import(raw) => match serde_json::from_str::<QuestConfig>(&raw) {
                Ok(config) => {
                    let id = self.store.create_from_quest_config(config, None).await;
                    vec![format!("Imported study set {}.", id)]
                }
                Err(e) => {
                    warn!("Rejected quest config import: {}", e);
                    vec![format!("Invalid quest config: {}", e)]
                }
            },
            Command::Create(raw) => {
                let draft = match serde_json::from_str::<StudySetDraft>(&raw) {
                    Ok(draft) => draft,
                    Err(e) => return vec![format!("Invalid study set: {}", e)],
                };
                match draft.validate() {
                    Ok(new_set) => {
                        let id = self.store.add_study_set(new_set).await;
                        vec![format!("Study set created! Open it with: study {}", id)]
                    }
                    Err(e) => vec![e.to_string()],
                }
            }
            Command::Help => help(),
            Command::Quit => self.shutdown().await,
        }
    }

    /// Tears down the active session without reporting an exit, then waits for pending
    /// reports and mirror writes to reach the host.
    pub async fn shutdown(&mut self) -> Vec<String> {
        if let Some(mut session) = self.session.take() {
            session.teardown();
        }
        self.store.analytics().flush().await;
        vec!["Goodbye.".to_string()]
    }

    async fn start_session(&mut self, id: &str, context: &NavigationContext) -> Vec<String> {
        match SessionController::start(id, context, &self.store) {
            Ok(session) => {
                let lines = render(&session.view().await);
                self.session = Some(session);
                lines
            }
            Err(SessionError::NotFound(_)) => {
                let mut lines = vec![
                    "Study set not found: the requested study set could not be found.".to_string(),
                ];
                lines.extend(self.list(self.store.study_sets()));
                lines
            }
            Err(e) => vec![e.to_string()],
        }
    }

    fn list(&self, sets: &[StudySet]) -> Vec<String> {
        if sets.is_empty() {
            return vec!["No study sets yet.".to_string()];
        }
        sets.iter()
            .map(|set| {
                format!(
                    "{:<20} {} ({} cards, by {}, updated {})",
                    set.id,
                    set.title,
                    set.cards.len(),
                    set.creator,
                    set.updated_at
                )
            })
            .collect()
    }
}

fn render(view: &SessionView) -> Vec<String> {
    let mut lines = vec![format!("{} | {}", view.title, view.position_label())];
    if let Some(card) = &view.current_card {
        lines.push(format!("  {} :: {}", card.term, card.definition));
    }
    if let Some(left) = view.time_left {
        lines.push(format!("  Time left: {}s", left));
    }
    if view.phase == SessionPhase::Completed {
        lines.push("  Session complete.".to_string());
    }
    lines
}

fn no_session() -> Vec<String> {
    vec!["No active study session. Use: study <id>".to_string()]
}

fn help() -> Vec<String> {
    [
        "list | recent            show study sets",
        "study <id>               start a study session",
        "next | prev | shuffle    navigate the active session",
        "status                   show the current card",
        "exit                     leave the active session",
        "import <json>            store a quest configuration as a study set",
        "create <json>            create a study set {title, description, cards}",
        "quit                     close the app",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}
