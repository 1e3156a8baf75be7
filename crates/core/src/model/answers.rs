use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("question {index} is out of range for a paper of {count} questions")]
    QuestionOutOfRange { index: usize, count: usize },
}

/// Per-attempt selection of option index by question index.
///
/// Keys are always `< question_count`, so the map never holds more entries
/// than the paper has questions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerMap {
    question_count: usize,
    selections: BTreeMap<usize, usize>,
}

impl AnswerMap {
    #[must_use]
    pub fn new(question_count: usize) -> Self {
        Self {
            question_count,
            selections: BTreeMap::new(),
        }
    }

    /// Record (or overwrite) the selection for a question; returns the previous one.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::QuestionOutOfRange` if `question` is not on the paper.
    pub fn select(&mut self, question: usize, option: usize) -> Result<Option<usize>, AnswerError> {
        if question >= self.question_count {
            return Err(AnswerError::QuestionOutOfRange {
                index: question,
                count: self.question_count,
            });
        }
        Ok(self.selections.insert(question, option))
    }

    #[must_use]
    pub fn get(&self, question: usize) -> Option<usize> {
        self.selections.get(&question).copied()
    }

    #[must_use]
    pub fn is_answered(&self, question: usize) -> bool {
        self.selections.contains_key(&question)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }
}
