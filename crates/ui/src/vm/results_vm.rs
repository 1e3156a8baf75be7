use cbt_core::model::{ScoreResult, option_letter};
use services::ReviewItem;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewLineVm {
    pub number: usize,
    pub prompt: String,
    pub chosen: String,
    pub correct: String,
    pub is_correct: bool,
    pub explanation: String,
}

impl From<&ReviewItem> for ReviewLineVm {
    fn from(item: &ReviewItem) -> Self {
        let letter = |index: usize| {
            item.options
                .get(index)
                .map(|text| format!("{}. {text}", option_letter(index)))
                .unwrap_or_default()
        };
        Self {
            number: item.index + 1,
            prompt: item.prompt.clone(),
            chosen: item.chosen.map_or_else(|| "Not answered".to_string(), letter),
            correct: letter(item.correct_option),
            is_correct: item.is_correct(),
            explanation: item.explanation.clone(),
        }
    }
}

/// Contents of the results modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub percentage: String,
    pub fraction: String,
    pub time_spent: String,
    pub review: Vec<ReviewLineVm>,
}

impl ResultsVm {
    #[must_use]
    pub fn new(score: &ScoreResult, review: &[ReviewItem]) -> Self {
        Self {
            percentage: format!("{}%", score.percentage),
            fraction: format!("{}/{}", score.correct, score.total),
            time_spent: score.formatted_time_spent(),
            review: review.iter().map(ReviewLineVm::from).collect(),
        }
    }
}
