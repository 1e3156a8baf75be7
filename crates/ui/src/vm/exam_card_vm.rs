use cbt_core::model::ExamDescriptor;

/// Shown when filter and search leave nothing visible.
pub const NO_RESULTS: &str = "No exams found matching your criteria.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamCardVm {
    pub id: String,
    pub badge: String,
    pub difficulty: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub questions: String,
    pub popularity: String,
    pub subject: String,
    pub color: String,
    pub start_label: String,
}

impl From<&ExamDescriptor> for ExamCardVm {
    fn from(exam: &ExamDescriptor) -> Self {
        Self {
            id: exam.id.as_str().to_string(),
            badge: exam.exam_type.as_str().to_uppercase(),
            difficulty: exam.difficulty.as_str().to_string(),
            title: exam.title.clone(),
            description: exam.description.clone(),
            duration: exam.formatted_duration(),
            questions: format!("{} questions", exam.question_count),
            popularity: format!("{}%", exam.popularity),
            subject: exam.subject.as_str().to_string(),
            color: exam.color.clone(),
            start_label: format!("Start {}", exam.title),
        }
    }
}

#[must_use]
pub fn map_exam_cards(exams: &[ExamDescriptor]) -> Vec<ExamCardVm> {
    exams.iter().map(ExamCardVm::from).collect()
}
