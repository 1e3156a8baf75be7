use cbt_core::model::{ExamId, ScoreResult};

/// What caused a session to be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    User,
    TimerExpired,
}

/// Change notifications published by a running test session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started {
        exam_id: ExamId,
        total: usize,
        remaining_secs: u32,
    },
    QuestionChanged {
        index: usize,
        total: usize,
    },
    AnswerSelected {
        question: usize,
        option: usize,
    },
    Tick {
        remaining_secs: u32,
    },
    Submitted {
        score: ScoreResult,
        trigger: SubmitTrigger,
    },
}
