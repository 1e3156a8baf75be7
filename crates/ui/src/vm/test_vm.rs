use cbt_core::model::option_letter;
use services::{SessionSnapshot, SessionState, TestSessionController, TestSessionError};

use crate::vm::results_vm::ResultsVm;
use crate::vm::time_fmt::format_countdown;

/// Below this many seconds the timer is shown in the warning colour.
pub const LOW_TIME_SECS: u32 = 300;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteButtonVm {
    pub number: usize,
    pub answered: bool,
    pub current: bool,
}

/// Everything the test page shows for one snapshot of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestScreenVm {
    pub title: String,
    pub counter: String,
    pub answered_count: usize,
    pub progress_percent: u32,
    pub passage: Option<String>,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub palette: Vec<PaletteButtonVm>,
    pub prev_disabled: bool,
    pub show_next: bool,
    pub show_submit: bool,
    pub timer: String,
    pub timer_low: bool,
    pub submitted: bool,
}

impl From<&SessionSnapshot> for TestScreenVm {
    fn from(snap: &SessionSnapshot) -> Self {
        let (passage, prompt, options) = match &snap.question {
            Some(question) => (
                question.passage().map(str::to_string),
                question.prompt().to_string(),
                question
                    .options()
                    .iter()
                    .enumerate()
                    .map(|(index, text)| OptionVm {
                        index,
                        label: format!("{}. {text}", option_letter(index)),
                        selected: snap.selected == Some(index),
                    })
                    .collect(),
            ),
            None => (None, String::new(), Vec::new()),
        };

        let palette = snap
            .answered
            .iter()
            .enumerate()
            .map(|(index, answered)| PaletteButtonVm {
                number: index + 1,
                answered: *answered,
                current: index == snap.index,
            })
            .collect();

        let progress_percent = if snap.total == 0 {
            0
        } else {
            u32::try_from((snap.index + 1) * 100 / snap.total).unwrap_or(100)
        };

        Self {
            title: snap.title.clone(),
            counter: format!("Question {} of {}", snap.index + 1, snap.total),
            answered_count: snap.progress.answered,
            progress_percent,
            passage,
            prompt,
            options,
            palette,
            prev_disabled: snap.is_first(),
            show_next: !snap.is_last(),
            show_submit: snap.is_last(),
            timer: format_countdown(snap.remaining_secs),
            timer_low: snap.remaining_secs < LOW_TIME_SECS,
            submitted: snap.state == SessionState::Submitted,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestIntent {
    Select(usize),
    Next,
    Previous,
    Jump(usize),
    Submit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestOutcome {
    Continue,
    Finished(ResultsVm),
}

/// Apply one user action to the running session.
///
/// # Errors
///
/// Returns `TestSessionError` for invalid selections and storage failures on submit.
pub async fn apply_intent(
    controller: &TestSessionController,
    intent: TestIntent,
) -> Result<TestOutcome, TestSessionError> {
    match intent {
        TestIntent::Select(option) => controller.select_answer(option)?,
        TestIntent::Next => {
            controller.next();
        }
        TestIntent::Previous => {
            controller.previous();
        }
        TestIntent::Jump(index) => {
            controller.go_to(isize::try_from(index).unwrap_or(isize::MAX));
        }
        TestIntent::Submit => {
            controller.submit().await?;
        }
    }
    Ok(match finished_results(controller) {
        Some(results) => TestOutcome::Finished(results),
        None => TestOutcome::Continue,
    })
}

/// Results for an attempt that has been closed, however it was closed.
/// A submit whose progress write failed still counts.
#[must_use]
pub fn finished_results(controller: &TestSessionController) -> Option<ResultsVm> {
    if controller.state() != SessionState::Submitted {
        return None;
    }
    let score = controller.score()?;
    Some(ResultsVm::new(&score, &controller.review()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use cbt_core::time::fixed_clock;
    use services::{AppConfig, AppServices};
    use storage::{KeyValueStore, Storage, StorageError};

    struct FailingWrites;

    #[async_trait]
    impl KeyValueStore for FailingWrites {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn services(minutes: u32) -> AppServices {
        let config = AppConfig {
            time_budget_secs: minutes * 60,
            ..AppConfig::default()
        };
        AppServices::in_memory(config, fixed_clock())
    }

    #[tokio::test(start_paused = true)]
    async fn first_question_screen() {
        let app = services(60);
        let controller = app.start_test("jamb-english-2024").unwrap();
        let vm = TestScreenVm::from(&controller.snapshot());

        assert_eq!(vm.counter, "Question 1 of 5");
        assert_eq!(vm.options[0].label.chars().take(3).collect::<String>(), "A. ");
        assert!(vm.prev_disabled);
        assert!(vm.show_next);
        assert!(!vm.show_submit);
        assert_eq!(vm.timer, "60:00");
        assert!(!vm.timer_low);
        assert_eq!(vm.progress_percent, 20);
        assert_eq!(vm.passage.as_deref(), Some("PASSAGE A"));
        assert!(vm.palette[0].current);
    }

    #[tokio::test(start_paused = true)]
    async fn intents_drive_the_session() {
        let app = services(4);
        let controller = app.start_test("jamb-english-2024").unwrap();

        apply_intent(&controller, TestIntent::Select(2)).await.unwrap();
        apply_intent(&controller, TestIntent::Jump(4)).await.unwrap();
        let vm = TestScreenVm::from(&controller.snapshot());
        assert!(vm.show_submit);
        assert!(!vm.show_next);
        assert!(vm.palette[0].answered);
        assert_eq!(vm.answered_count, 1);
        assert!(vm.timer_low);

        let outcome = apply_intent(&controller, TestIntent::Submit).await.unwrap();
        let TestOutcome::Finished(results) = outcome else {
            panic!("expected results after submit");
        };
        assert_eq!(results.fraction, "1/5");
        assert_eq!(results.percentage, "20%");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_submit_still_yields_results() {
        let storage = Storage::from_store(Arc::new(FailingWrites));
        let app = AppServices::new(&storage, AppConfig::default(), fixed_clock());
        let controller = app.start_test("jamb-english-2024").unwrap();
        assert!(finished_results(&controller).is_none());

        apply_intent(&controller, TestIntent::Select(2)).await.unwrap();
        let err = apply_intent(&controller, TestIntent::Submit).await.unwrap_err();
        assert!(matches!(err, TestSessionError::Storage(_)));

        let results = finished_results(&controller).expect("attempt is closed");
        assert_eq!(results.fraction, "1/5");
        assert!(matches!(
            apply_intent(&controller, TestIntent::Next).await,
            Ok(TestOutcome::Finished(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn selected_option_is_marked() {
        let app = services(60);
        let controller = app.start_test("jamb-math-2024").unwrap();
        controller.select_answer(3).unwrap();
        let vm = TestScreenVm::from(&controller.snapshot());
        assert!(vm.options[3].selected);
        assert!(!vm.options[0].selected);
    }
}
