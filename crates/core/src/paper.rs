//! Question papers: the fixed question list a test session runs over.

use thiserror::Error;

use crate::catalog::ExamCatalog;
use crate::model::{ExamId, Question, QuestionDifficulty, QuestionError, QuestionId};

/// Every attempt gets the same budget, independent of the exam's nominal duration.
pub const DEFAULT_TIME_BUDGET_SECS: u32 = 60 * 60;

/// Problems resolving which exam a test page should run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("No exam specified")]
    MissingExam,

    #[error("Exam not found: {0}")]
    UnknownExam(String),
}

/// A loaded exam attempt: descriptor title, time budget and questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPaper {
    exam_id: ExamId,
    title: String,
    time_budget_secs: u32,
    questions: Vec<Question>,
}

impl TestPaper {
    #[must_use]
    pub fn new(exam_id: ExamId, title: impl Into<String>, time_budget_secs: u32, questions: Vec<Question>) -> Self {
        Self {
            exam_id,
            title: title.into(),
            time_budget_secs,
            questions,
        }
    }

    /// Load the paper for a catalog exam.
    ///
    /// All catalog exams currently share the JAMB Use of English passage paper.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::MissingExam` for a blank id and
    /// `NavigationError::UnknownExam` for an id not in the catalog.
    /// Returns `QuestionError` wrapped in `PaperError` if the bundled questions are malformed.
    pub fn for_exam(
        catalog: &ExamCatalog,
        exam_id: &str,
        time_budget_secs: u32,
    ) -> Result<Self, PaperError> {
        let exam_id = exam_id.trim();
        if exam_id.is_empty() {
            return Err(NavigationError::MissingExam.into());
        }
        let exam = catalog
            .find(exam_id)
            .ok_or_else(|| NavigationError::UnknownExam(exam_id.to_string()))?;

        Ok(Self::new(
            exam.id.clone(),
            exam.title.clone(),
            time_budget_secs,
            passage_a_questions()?,
        ))
    }

    #[must_use]
    pub fn exam_id(&self) -> &ExamId {
        &self.exam_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn time_budget_secs(&self) -> u32 {
        self.time_budget_secs
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PaperError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Question(#[from] QuestionError),
}

const PASSAGE_A: &str = "PASSAGE A";

fn passage_question(
    id: u32,
    prompt: &str,
    options: [&str; 5],
    correct: usize,
    explanation: &str,
    difficulty: QuestionDifficulty,
) -> Result<Question, QuestionError> {
    Question::new(
        QuestionId::new(id),
        prompt,
        options.iter().map(|o| (*o).to_string()).collect(),
        correct,
        explanation,
        Some(PASSAGE_A.to_string()),
        difficulty,
    )
}

fn passage_a_questions() -> Result<Vec<Question>, QuestionError> {
    use QuestionDifficulty::{Easy, Hard, Medium};

    Ok(vec![
        passage_question(
            1,
            "The author observes that",
            [
                "war, pestilence and famine were caused by the extravagance of nature",
                "Nature was heartless and senseless",
                "there was a time when uncontrolled birth made sense",
                "It was wise at a time when mankind did not interfere with normal reproduction",
                "nature was heartless in its reproductive process",
            ],
            2,
            "The passage suggests uncontrolled birth made sense when nature decimated population through war, pestilence, and famine.",
            Medium,
        )?,
        passage_question(
            2,
            "Which of these statements does not express the option of the author?",
            [
                "Mankind has started to interfere with the work of nature",
                "Many people had died in the past through want and disease",
                "Mankind should not have the maximum number of children possible",
                "Mankind should take care of its children",
                "Man's present relationship with nature in matters of birth and death is a happy one.",
            ],
            4,
            "The author suggests the relationship is problematic, not happy.",
            Hard,
        )?,
        passage_question(
            3,
            "Humane, as used in the passage means",
            ["sensible", "wise", "human", "benevolent", "thorough"],
            3,
            "Humane means showing compassion and benevolence.",
            Easy,
        )?,
        passage_question(
            4,
            "'We must consciously try to establish an equilibrium' implies that mankind must",
            [
                "realistically find an equation",
                "strive not to be wasteful",
                "deliberately try to fight nature",
                "try to fight nature",
                "purposely find a balance",
            ],
            4,
            "Equilibrium means balance between birth and death rates.",
            Medium,
        )?,
        passage_question(
            5,
            "The main idea of this passage is that",
            [
                "nature is heartless",
                "man should control the birth rate",
                "mankind will soon perish of starvation",
                "pestilence causes more death than war",
                "man should change nature's course gradually",
            ],
            1,
            "The passage argues for birth control to balance reduced death rates.",
            Medium,
        )?,
    ])
}
