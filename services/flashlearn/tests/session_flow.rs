mod common;

use common::{settle, store_with, CountingCache, RecordingHost};
use flashlearn_core::domain::{QuestCard, QuestConfig};
use flashlearn_core::ACTIVITY_ENDED_EVENT;
use flashlearn_lib::study::{
    NavigationContext, SessionController, SessionError, SessionPhase, StudySetStore,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn config(count: usize, time_limit: Option<u32>, shuffled: bool) -> QuestConfig {
    QuestConfig {
        title: Some("Host Quiz".to_string()),
        description: None,
        cards: (0..count)
            .map(|i| QuestCard {
                term: format!("term-{}", i),
                definition: format!("definition-{}", i),
            })
            .collect(),
        difficulty: None,
        time_limit,
        shuffled: Some(shuffled),
    }
}

async fn loaded_store(host: &Arc<RecordingHost>) -> StudySetStore {
    let mut store = store_with(CountingCache::new(), Some(host.clone()));
    store.load().await;
    store
}

fn start_ephemeral(store: &StudySetStore, config: QuestConfig) -> SessionController {
    SessionController::start("quest-1", &NavigationContext::with_config(config), store).unwrap()
}

fn reports(host: &RecordingHost) -> Vec<Value> {
    host.events_named(ACTIVITY_ENDED_EVENT)
}

//=========================================================================================
// Countdown
//=========================================================================================

#[tokio::test(start_paused = true)]
async fn countdown_expiry_reports_a_single_timeout() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;
    let quest = QuestConfig {
        title: None,
        description: None,
        cards: vec![
            QuestCard {
                term: "a".to_string(),
                definition: "1".to_string(),
            },
            QuestCard {
                term: "b".to_string(),
                definition: "2".to_string(),
            },
        ],
        difficulty: None,
        time_limit: Some(1),
        shuffled: Some(false),
    };
    let session = start_ephemeral(&store, quest);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    settle().await;

    let reports = reports(&host);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["reason"], json!("timeout"));
    assert_eq!(reports[0]["action"], json!("end"));
    assert_eq!(reports[0]["progress"], json!(1));
    assert_eq!(reports[0]["completion"], json!(50));
    assert_eq!(reports[0]["timeRemaining"], json!(0));
    assert_eq!(reports[0]["setId"], json!("quest-1"));
    assert_eq!(session.view().await.phase, SessionPhase::Completed);
}

#[tokio::test(start_paused = true)]
async fn timeout_then_last_card_still_reports_once() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;
    let session = start_ephemeral(&store, config(2, Some(2), false));

    tokio::time::sleep(Duration::from_millis(2500)).await;
    session.advance().await;
    session.advance().await;
    settle().await;

    let reports = reports(&host);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["reason"], json!("timeout"));
}

#[tokio::test(start_paused = true)]
async fn countdown_stops_at_zero() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;
    let session = start_ephemeral(&store, config(3, Some(2), false));

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(session.view().await.time_left, Some(1));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(session.view().await.time_left, Some(0));
}

#[tokio::test(start_paused = true)]
async fn exit_releases_the_countdown() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;
    let session = start_ephemeral(&store, config(3, Some(5), false));

    tokio::time::sleep(Duration::from_millis(1500)).await;
    session.exit().await;
    tokio::time::sleep(Duration::from_secs(10)).await;
    settle().await;

    let reports = reports(&host);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["reason"], json!("user_exit"));
    assert_eq!(reports[0]["action"], json!("exit"));
    assert_eq!(reports[0]["timeRemaining"], json!(4));
}

#[tokio::test(start_paused = true)]
async fn leaving_the_route_silences_the_countdown() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;
    let session = start_ephemeral(&store, config(3, Some(2), false));

    drop(session);
    tokio::time::sleep(Duration::from_secs(5)).await;
    settle().await;

    assert!(reports(&host).is_empty());
}

//=========================================================================================
// Navigation and Completion
//=========================================================================================

#[tokio::test]
async fn reaching_the_last_card_finishes_once() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;
    let session = start_ephemeral(&store, config(3, None, false));

    assert_eq!(session.advance().await, 1);
    settle().await;
    assert!(reports(&host).is_empty());

    assert_eq!(session.advance().await, 2);
    assert_eq!(session.advance().await, 2);
    session.retreat().await;
    session.advance().await;
    settle().await;

    let reports = reports(&host);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["reason"], json!("finished"));
    assert_eq!(reports[0]["progress"], json!(3));
    assert_eq!(reports[0]["completion"], json!(100));
    assert_eq!(reports[0]["cardCount"], json!(3));
    assert!(reports[0].get("timeRemaining").is_none());
}

#[tokio::test]
async fn single_card_session_finishes_on_first_advance() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;
    let session = start_ephemeral(&store, config(1, None, false));

    assert_eq!(session.advance().await, 0);
    settle().await;

    assert_eq!(reports(&host).len(), 1);
}

#[tokio::test]
async fn retreat_never_completes_or_reopens() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;
    let session = start_ephemeral(&store, config(2, None, false));

    session.retreat().await;
    assert_eq!(session.view().await.phase, SessionPhase::Active);

    session.advance().await;
    session.retreat().await;
    let view = session.view().await;
    assert_eq!(view.position, 1);
    assert_eq!(view.phase, SessionPhase::Completed);
}

#[tokio::test]
async fn exit_after_completion_reports_nothing_more() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;
    let session = start_ephemeral(&store, config(2, None, false));

    session.advance().await;
    session.exit().await;
    settle().await;

    let reports = reports(&host);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["reason"], json!("finished"));
}

#[tokio::test]
async fn persisted_sessions_stay_in_bounds_and_never_report() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;

    for id in ["1", "2", "3"] {
        let count = store.get_study_set(id).unwrap().cards.len();
        let session =
            SessionController::start(id, &NavigationContext::default(), &store).unwrap();

        for _ in 0..count + 5 {
            session.advance().await;
        }
        assert_eq!(session.view().await.position, count);
        for _ in 0..count + 5 {
            session.retreat().await;
        }
        assert_eq!(session.view().await.position, 1);

        session.exit().await;
    }
    settle().await;

    assert!(reports(&host).is_empty());
}

#[tokio::test]
async fn unknown_set_is_not_found() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;

    let result = SessionController::start("missing", &NavigationContext::default(), &store);
    assert!(matches!(result, Err(SessionError::NotFound(id)) if id == "missing"));

    // An ephemeral-looking id without a configuration is an ordinary lookup.
    let result = SessionController::start("quest-9", &NavigationContext::default(), &store);
    assert!(matches!(result, Err(SessionError::NotFound(_))));
}

#[tokio::test]
async fn stored_quest_sets_run_as_persisted_sessions() {
    let host = RecordingHost::new();
    let mut store = loaded_store(&host).await;
    let id = store
        .create_from_quest_config(config(2, None, false), Some("quest-42"))
        .await;

    let session = SessionController::start(&id, &NavigationContext::default(), &store).unwrap();
    assert!(!session.view().await.is_ephemeral);
    session.advance().await;
    settle().await;

    assert!(reports(&host).is_empty());
}

#[tokio::test]
async fn empty_configuration_cannot_start() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;

    let result = SessionController::start(
        "quest-1",
        &NavigationContext::with_config(config(0, None, false)),
        &store,
    );
    assert!(matches!(result, Err(SessionError::EmptyStudySet(_))));
}

//=========================================================================================
// Shuffling
//=========================================================================================

#[tokio::test]
async fn ephemeral_cards_keep_their_ids_through_shuffles() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;
    let session = start_ephemeral(&store, config(6, None, true));

    session.advance().await;
    session.shuffle().await;
    assert_eq!(session.view().await.position, 1);

    let mut seen = Vec::new();
    for _ in 0..6 {
        let card = session.view().await.current_card.unwrap();
        assert_eq!(card.id, format!("card-{}", &card.term["term-".len()..]));
        seen.push(card.id);
        session.advance().await;
    }
    seen.sort();
    assert_eq!(
        seen,
        (0..6).map(|i| format!("card-{}", i)).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn shuffle_after_completion_is_allowed_and_silent() {
    let host = RecordingHost::new();
    let store = loaded_store(&host).await;
    let session = start_ephemeral(&store, config(2, None, false));

    session.advance().await;
    session.shuffle().await;
    settle().await;

    let view = session.view().await;
    assert_eq!(view.position, 1);
    assert_eq!(view.phase, SessionPhase::Completed);
    assert_eq!(reports(&host).len(), 1);
}
