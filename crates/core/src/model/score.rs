use serde::{Deserialize, Serialize};

use crate::model::answers::AnswerMap;
use crate::model::question::Question;

/// Outcome of one submitted attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
    pub time_spent_secs: u64,
}

impl ScoreResult {
    /// Count questions whose recorded answer equals the correct option.
    #[must_use]
    pub fn grade(questions: &[Question], answers: &AnswerMap, time_spent_secs: u64) -> Self {
        let correct = questions
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                answers
                    .get(*index)
                    .is_some_and(|option| question.is_correct(option))
            })
            .count();
        let correct = u32::try_from(correct).unwrap_or(u32::MAX);
        let total = u32::try_from(questions.len()).unwrap_or(u32::MAX);

        Self {
            correct,
            total,
            percentage: rounded_percentage(correct, total),
            time_spent_secs,
        }
    }

    /// Time spent as `m:ss`.
    #[must_use]
    pub fn formatted_time_spent(&self) -> String {
        format!("{}:{:02}", self.time_spent_secs / 60, self.time_spent_secs % 60)
    }
}

/// `round(100 * correct / total)` with halves rounded up; an empty paper scores 0.
#[must_use]
pub fn rounded_percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (correct, total) = (u64::from(correct), u64::from(total));
    let rounded = (200 * correct + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::QuestionId;
    use crate::model::question::QuestionDifficulty;

    fn questions(correct: &[usize]) -> Vec<Question> {
        correct
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Question::new(
                    QuestionId::new(u32::try_from(i).unwrap() + 1),
                    format!("Q{i}"),
                    (0..5).map(|o| format!("opt {o}")).collect(),
                    *c,
                    "",
                    None,
                    QuestionDifficulty::Medium,
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn four_of_five_scores_eighty() {
        let paper = questions(&[2, 4, 3, 4, 1]);
        let mut answers = AnswerMap::new(paper.len());
        for (q, o) in [(0, 2), (1, 4), (2, 3), (3, 0), (4, 1)] {
            answers.select(q, o).unwrap();
        }

        let score = ScoreResult::grade(&paper, &answers, 75);
        assert_eq!(score.correct, 4);
        assert_eq!(score.total, 5);
        assert_eq!(score.percentage, 80);
        assert_eq!(score.formatted_time_spent(), "1:15");
    }

    #[test]
    fn unanswered_questions_count_as_wrong() {
        let paper = questions(&[0, 1, 2]);
        let mut answers = AnswerMap::new(paper.len());
        answers.select(0, 0).unwrap();

        let score = ScoreResult::grade(&paper, &answers, 0);
        assert_eq!(score.correct, 1);
        assert_eq!(score.percentage, 33);
    }

    #[test]
    fn empty_paper_scores_zero() {
        let score = ScoreResult::grade(&[], &AnswerMap::new(0), 10);
        assert_eq!(score.total, 0);
        assert_eq!(score.percentage, 0);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(rounded_percentage(1, 8), 13);
        assert_eq!(rounded_percentage(2, 3), 67);
    }
}
