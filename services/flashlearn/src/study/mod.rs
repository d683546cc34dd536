pub mod analytics;
pub mod create;
pub mod launch;
pub mod samples;
pub mod session;
pub mod state;
pub mod store;
pub mod timer;

// Re-export the pieces the binary and the tests wire together.
pub use analytics::Analytics;
pub use create::{StudySetDraft, ValidationError};
pub use launch::{resolve_launch, Navigation, NavigationContext, Route};
pub use session::{SessionController, SessionError};
pub use state::{SessionPhase, SessionState, SessionView};
pub use store::{StudySetStore, STORAGE_KEY};
