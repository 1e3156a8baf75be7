use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use cbt_core::TestPaper;
use cbt_core::model::ScoreResult;
use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::error::TestSessionError;
use crate::progress_service::ProgressService;
use crate::schedule::{TimerHandle, spawn_ticker};
use crate::sessions::events::{SessionEvent, SubmitTrigger};
use crate::sessions::machine::{ReviewItem, SessionSnapshot, SessionState, TestSession, Tick};

const TICK_PERIOD: Duration = Duration::from_secs(1);
const EVENT_CAPACITY: usize = 64;

struct Shared {
    session: Mutex<TestSession>,
    timer: Mutex<TimerHandle>,
    events: broadcast::Sender<SessionEvent>,
    progress: ProgressService,
    started_at: Instant,
}

impl Shared {
    fn session(&self) -> MutexGuard<'_, TestSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn timer(&self) -> MutexGuard<'_, TimerHandle> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn elapsed_secs(&self) -> u64 {
        let millis = u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        millis.saturating_add(500) / 1000
    }

    /// Close the attempt. The state transition under the session lock makes
    /// this effective exactly once, whichever trigger arrives first.
    async fn finish(&self, trigger: SubmitTrigger) -> Result<Option<ScoreResult>, TestSessionError> {
        let elapsed = self.elapsed_secs();
        let submitted = self.session().submit(elapsed);
        let Some(score) = submitted else {
            return Ok(None);
        };

        {
            let mut timer = self.timer();
            match trigger {
                SubmitTrigger::User => timer.cancel(),
                // Running inside the timer task itself.
                SubmitTrigger::TimerExpired => timer.detach(),
            }
        }

        tracing::info!(
            correct = score.correct,
            total = score.total,
            percentage = score.percentage,
            ?trigger,
            "test submitted"
        );

        let saved = self.progress.record_attempt(&score).await;
        self.emit(SessionEvent::Submitted { score, trigger });
        saved?;
        Ok(Some(score))
    }

    async fn on_tick(&self) -> ControlFlow<()> {
        let tick = self.session().tick();
        match tick {
            Tick::Running { remaining_secs } => {
                tracing::trace!(remaining_secs, "tick");
                self.emit(SessionEvent::Tick { remaining_secs });
                ControlFlow::Continue(())
            }
            Tick::Expired => {
                self.emit(SessionEvent::Tick { remaining_secs: 0 });
                if let Err(err) = self.finish(SubmitTrigger::TimerExpired).await {
                    tracing::error!(error = %err, "failed to record timed-out attempt");
                }
                ControlFlow::Break(())
            }
            Tick::Idle => ControlFlow::Break(()),
        }
    }
}

/// Drives one test attempt: owns the countdown task, serialises answers and
/// navigation, and publishes `SessionEvent`s.
///
/// Clones share the same attempt. Dropping the last clone stops the countdown.
#[derive(Clone)]
pub struct TestSessionController {
    shared: Arc<Shared>,
}

impl TestSessionController {
    /// Begin an attempt on `paper` and start the one-second countdown.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `TestSessionError::AlreadyStarted` if the session cannot leave `Loading`.
    pub fn start(paper: TestPaper, progress: ProgressService) -> Result<Self, TestSessionError> {
        let mut session = TestSession::new(paper);
        session.begin()?;

        let started = SessionEvent::Started {
            exam_id: session.paper().exam_id().clone(),
            total: session.paper().len(),
            remaining_secs: session.remaining_secs(),
        };
        tracing::info!(exam_id = %session.paper().exam_id(), "test session started");

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shared = Arc::new(Shared {
            session: Mutex::new(session),
            timer: Mutex::new(TimerHandle::default()),
            events,
            progress,
            started_at: Instant::now(),
        });
        shared.emit(started);

        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let ticker = spawn_ticker(TICK_PERIOD, move || {
            let weak = Weak::clone(&weak);
            async move {
                match weak.upgrade() {
                    Some(shared) => shared.on_tick().await,
                    None => ControlFlow::Break(()),
                }
            }
        });
        *shared.timer() = ticker;

        Ok(Self { shared })
    }

    /// Receiver for events published from now on.
    ///
    /// The channel buffers a bounded number of events. A subscriber that
    /// falls further behind gets `RecvError::Lagged` and misses the oldest
    /// ones (usually ticks); later events, including `Submitted`, still arrive.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    /// # Errors
    ///
    /// Returns `TestSessionError::NotInProgress` after submission and
    /// `TestSessionError::InvalidOption` for an option the question lacks.
    pub fn select_answer(&self, option: usize) -> Result<(), TestSessionError> {
        let (changed, question) = {
            let mut session = self.shared.session();
            (session.select_answer(option)?, session.current_index())
        };
        if changed {
            self.shared
                .emit(SessionEvent::AnswerSelected { question, option });
        }
        Ok(())
    }

    /// Jump to a question; out-of-range targets are ignored.
    pub fn go_to(&self, index: isize) -> bool {
        self.navigate(|session| session.go_to(index))
    }

    pub fn next(&self) -> bool {
        self.navigate(TestSession::next)
    }

    pub fn previous(&self) -> bool {
        self.navigate(TestSession::previous)
    }

    fn navigate(&self, step: impl FnOnce(&mut TestSession) -> bool) -> bool {
        let moved = {
            let mut session = self.shared.session();
            step(&mut session).then(|| (session.current_index(), session.paper().len()))
        };
        match moved {
            Some((index, total)) => {
                tracing::debug!(index, "question changed");
                self.shared
                    .emit(SessionEvent::QuestionChanged { index, total });
                true
            }
            None => false,
        }
    }

    /// Submit on the user's behalf. Returns the score only for the call that
    /// actually closed the attempt.
    ///
    /// # Errors
    ///
    /// Returns `TestSessionError::Storage` if progress cannot be saved; the
    /// attempt is still closed and the `Submitted` event still published.
    pub async fn submit(&self) -> Result<Option<ScoreResult>, TestSessionError> {
        self.shared.finish(SubmitTrigger::User).await
    }

    /// Stop the countdown without submitting, as when leaving the page.
    pub fn abandon(&self) {
        self.shared.timer().cancel();
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.session().snapshot()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.shared.session().state()
    }

    #[must_use]
    pub fn score(&self) -> Option<ScoreResult> {
        self.shared.session().score()
    }

    #[must_use]
    pub fn review(&self) -> Vec<ReviewItem> {
        self.shared.session().review()
    }

    #[must_use]
    pub fn is_timer_active(&self) -> bool {
        self.shared.timer().is_active()
    }
}
