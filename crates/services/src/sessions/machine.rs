use cbt_core::TestPaper;
use cbt_core::model::{AnswerMap, ExamId, Question, ScoreResult};

use crate::error::TestSessionError;
use crate::sessions::progress::SessionProgress;

/// Lifecycle of one attempt. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    InProgress,
    Submitted,
}

/// Outcome of one countdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running { remaining_secs: u32 },
    Expired,
    /// The session is not in progress; the countdown should stop.
    Idle,
}

/// Read-only copy of everything a test screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub exam_id: ExamId,
    pub title: String,
    pub index: usize,
    pub total: usize,
    pub question: Option<Question>,
    pub selected: Option<usize>,
    pub answered: Vec<bool>,
    pub progress: SessionProgress,
    pub remaining_secs: u32,
    pub score: Option<ScoreResult>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.total
    }
}

/// One graded question, available after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub index: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub chosen: Option<usize>,
    pub correct_option: usize,
    pub explanation: String,
}

impl ReviewItem {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.chosen == Some(self.correct_option)
    }
}

/// Pure state machine for a single attempt: navigation, answers, countdown
/// and grading. Time is passed in; nothing here schedules work.
#[derive(Debug, Clone)]
pub struct TestSession {
    paper: TestPaper,
    state: SessionState,
    current: usize,
    answers: AnswerMap,
    remaining_secs: u32,
    score: Option<ScoreResult>,
}

impl TestSession {
    #[must_use]
    pub fn new(paper: TestPaper) -> Self {
        let answers = AnswerMap::new(paper.len());
        let remaining_secs = paper.time_budget_secs();
        Self {
            paper,
            state: SessionState::Loading,
            current: 0,
            answers,
            remaining_secs,
            score: None,
        }
    }

    /// Move from `Loading` to `InProgress` at the first question.
    ///
    /// # Errors
    ///
    /// Returns `TestSessionError::AlreadyStarted` if the session has left `Loading`.
    pub fn begin(&mut self) -> Result<(), TestSessionError> {
        if self.state != SessionState::Loading {
            return Err(TestSessionError::AlreadyStarted);
        }
        self.state = SessionState::InProgress;
        self.current = 0;
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn paper(&self) -> &TestPaper {
        &self.paper
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.paper.questions().get(self.current)
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn score(&self) -> Option<ScoreResult> {
        self.score
    }

    /// Record `option` for the current question. Returns whether the
    /// selection changed; re-selecting the same option is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `TestSessionError::NotInProgress` outside `InProgress` and
    /// `TestSessionError::InvalidOption` if the question has no such option.
    pub fn select_answer(&mut self, option: usize) -> Result<bool, TestSessionError> {
        if self.state != SessionState::InProgress {
            return Err(TestSessionError::NotInProgress);
        }
        let count = self
            .current_question()
            .map_or(0, Question::option_count);
        if option >= count {
            return Err(TestSessionError::InvalidOption { option, count });
        }
        let previous = self
            .answers
            .select(self.current, option)
            .map_err(|_| TestSessionError::InvalidOption { option, count })?;
        Ok(previous != Some(option))
    }

    /// Jump to `index`. Out-of-range targets and calls outside `InProgress`
    /// are ignored. Returns whether the pointer moved.
    pub fn go_to(&mut self, index: isize) -> bool {
        if self.state != SessionState::InProgress {
            return false;
        }
        let Ok(index) = usize::try_from(index) else {
            return false;
        };
        if index >= self.paper.len() || index == self.current {
            return false;
        }
        self.current = index;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.offset(1))
    }

    pub fn previous(&mut self) -> bool {
        self.go_to(self.offset(-1))
    }

    fn offset(&self, delta: isize) -> isize {
        isize::try_from(self.current)
            .unwrap_or(isize::MAX)
            .saturating_add(delta)
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> Tick {
        if self.state != SessionState::InProgress {
            return Tick::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            Tick::Expired
        } else {
            Tick::Running {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Grade and close the attempt. Only the first call out of `InProgress`
    /// produces a score; every later call returns `None`.
    pub fn submit(&mut self, time_spent_secs: u64) -> Option<ScoreResult> {
        if self.state != SessionState::InProgress {
            return None;
        }
        self.state = SessionState::Submitted;
        let score = ScoreResult::grade(self.paper.questions(), &self.answers, time_spent_secs);
        self.score = Some(score);
        Some(score)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            exam_id: self.paper.exam_id().clone(),
            title: self.paper.title().to_string(),
            index: self.current,
            total: self.paper.len(),
            question: self.current_question().cloned(),
            selected: self.answers.get(self.current),
            answered: (0..self.paper.len())
                .map(|i| self.answers.is_answered(i))
                .collect(),
            progress: SessionProgress::from_answers(&self.answers),
            remaining_secs: self.remaining_secs,
            score: self.score,
        }
    }

    /// Per-question breakdown; empty until the attempt is submitted.
    #[must_use]
    pub fn review(&self) -> Vec<ReviewItem> {
        if self.state != SessionState::Submitted {
            return Vec::new();
        }
        self.paper
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| ReviewItem {
                index,
                prompt: question.prompt().to_string(),
                options: question.options().to_vec(),
                chosen: self.answers.get(index),
                correct_option: question.correct_option(),
                explanation: question.explanation().to_string(),
            })
            .collect()
    }
}
