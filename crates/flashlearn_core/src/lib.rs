pub mod domain;
pub mod gateway;
pub mod ports;

pub use domain::{
    completion_percent, ActivityEnded, Difficulty, EndReason, Flashcard, NewStudySet, QuestCard,
    QuestConfig, RemoteStudySet, ReportAction, StudySet, UserProfile, UserStudySets,
};
pub use gateway::{
    ProfileGateway, ACTIVITY_ENDED_EVENT, CONFIG_CHANGED_EVENT, USER_STUDY_SETS_KEY,
};
pub use ports::{LocalCache, PortError, PortResult, ProfileService};
