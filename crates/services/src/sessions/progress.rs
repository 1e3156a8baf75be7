use cbt_core::model::AnswerMap;

/// Aggregated view of answer progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn from_answers(answers: &AnswerMap) -> Self {
        let total = answers.question_count();
        let answered = answers.len();
        Self {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: total > 0 && answered == total,
        }
    }
}
