use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cbt_core::time::fixed_now;
use cbt_core::{NavigationError, PaperError};
use services::{
    AppConfig, AppServices, Clock, SessionEvent, SessionState, SubmitTrigger, TestSessionError,
};
use storage::{KeyValueStore, Storage, StorageError};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

/// Drain buffered events and return the trigger of the `Submitted` event.
/// A subscriber that fell behind the countdown skips the overwritten ticks.
fn submitted_trigger(events: &mut broadcast::Receiver<SessionEvent>) -> Option<SubmitTrigger> {
    let mut trigger = None;
    loop {
        match events.try_recv() {
            Ok(SessionEvent::Submitted { trigger: t, .. }) => trigger = Some(t),
            Ok(_) | Err(TryRecvError::Lagged(_)) => {}
            Err(TryRecvError::Empty | TryRecvError::Closed) => return trigger,
        }
    }
}

fn config(minutes: u32) -> AppConfig {
    AppConfig {
        time_budget_secs: minutes * 60,
        ..AppConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn register_login_take_test_and_see_progress() {
    let app = AppServices::in_memory(config(60), Clock::fixed(fixed_now()));
    let auth = app.auth();

    auth.register("alice", "alice@example.com", "secret")
        .await
        .unwrap();
    auth.login("alice", "secret").await.unwrap();

    let launch = app
        .catalog()
        .start_exam(&auth, "jamb-english-2024")
        .await
        .unwrap();
    let session = app.start_test(launch.exam_id.as_str()).unwrap();
    let mut events = session.subscribe();

    for (index, option) in [2, 4, 3, 4, 0].into_iter().enumerate() {
        session.go_to(isize::try_from(index).unwrap());
        session.select_answer(option).unwrap();
    }
    tokio::time::sleep(Duration::from_secs(95)).await;

    let score = session.submit().await.unwrap().expect("first submit scores");
    assert_eq!((score.correct, score.total, score.percentage), (4, 5, 80));
    assert_eq!(score.formatted_time_spent(), "1:35");

    assert_eq!(submitted_trigger(&mut events), Some(SubmitTrigger::User));

    let dashboard = app.dashboard().load().await.unwrap();
    assert_eq!(dashboard.progress.tests_completed, 1);
    assert_eq!(dashboard.progress.average_score, 80);
    assert_eq!(dashboard.progress.study_time, 95);
    assert_eq!(
        dashboard.user.map(|u| u.username).as_deref(),
        Some("alice")
    );
}

#[tokio::test(start_paused = true)]
async fn manual_submit_racing_expiry_counts_once() {
    let app = AppServices::in_memory(config(1), Clock::fixed(fixed_now()));
    app.auth().login("bob", "pw").await.unwrap();
    let session = app.start_test("waec-math-2024").unwrap();

    tokio::time::sleep(Duration::from_millis(59_900)).await;
    let (manual, _) = tokio::join!(
        session.submit(),
        tokio::time::sleep(Duration::from_secs(2))
    );
    assert!(manual.unwrap().is_some());
    assert!(session.submit().await.unwrap().is_none());
    assert_eq!(session.state(), SessionState::Submitted);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(app.progress().load().await.unwrap().tests_completed, 1);
}

#[tokio::test(start_paused = true)]
async fn expiry_without_answers_scores_zero() {
    let app = AppServices::in_memory(config(1), Clock::fixed(fixed_now()));
    let session = app.start_test("neco-math-2024").unwrap();

    tokio::time::sleep(Duration::from_secs(61)).await;
    let score = session.score().expect("timer submitted the attempt");
    assert_eq!(score.percentage, 0);
    assert_eq!(score.time_spent_secs, 60);
    assert_eq!(app.progress().load().await.unwrap().tests_completed, 1);
}

#[tokio::test]
async fn unknown_or_missing_exam_is_a_navigation_error() {
    let app = AppServices::in_memory(config(60), Clock::fixed(fixed_now()));

    let err = app.start_test("history-1999").err().unwrap();
    assert!(matches!(
        err,
        TestSessionError::Paper(PaperError::Navigation(NavigationError::UnknownExam(ref id)))
            if id == "history-1999"
    ));

    let err = app.start_test("  ").err().unwrap();
    assert_eq!(err.to_string(), "No exam specified");
}

/// Reads succeed, writes fail.
struct ReadOnlyStore;

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("read-only".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("read-only".into()))
    }
}

#[tokio::test(start_paused = true)]
async fn failed_progress_write_still_closes_attempt() {
    let storage = Storage::from_store(Arc::new(ReadOnlyStore));
    let app = AppServices::new(&storage, config(60), Clock::fixed(fixed_now()));
    let session = app.start_test("jamb-physics-2024").unwrap();
    let mut events = session.subscribe();

    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, TestSessionError::Storage(_)));
    assert_eq!(session.state(), SessionState::Submitted);
    assert!(matches!(
        events.try_recv(),
        Ok(SessionEvent::Submitted { trigger: SubmitTrigger::User, .. })
    ));
    assert!(!session.is_timer_active());
}
