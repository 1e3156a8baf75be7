//! Static exam catalog with a composable category filter and text search.

use crate::model::{Difficulty, ExamDescriptor, ExamId, ExamType, Subject};

/// The category half of a catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Exams whose type or subject equals the value exactly.
    Only(String),
}

impl CategoryFilter {
    /// Only `"all"` selects everything; anything else, blank included, is an
    /// exact category compared without trimming.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "all" => Self::All,
            other => Self::Only(other.to_string()),
        }
    }

    #[must_use]
    pub fn admits(&self, exam: &ExamDescriptor) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => exam.matches_category(category),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category,
        }
    }
}

/// Normalise a raw search box value: trimmed and lower-cased.
#[must_use]
pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// The in-memory exam list plus the current working set.
///
/// Filter and search compose: an exam is visible when it passes the category
/// filter AND (if a term is set) matches the search term.
#[derive(Debug, Clone)]
pub struct ExamCatalog {
    exams: Vec<ExamDescriptor>,
    filter: CategoryFilter,
    term: String,
    visible: Vec<usize>,
}

impl ExamCatalog {
    #[must_use]
    pub fn new(exams: Vec<ExamDescriptor>) -> Self {
        let visible = (0..exams.len()).collect();
        Self {
            exams,
            filter: CategoryFilter::All,
            term: String::new(),
            visible,
        }
    }

    /// The built-in WAEC / JAMB / NECO practice exams.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_exams())
    }

    /// Replace the category filter and recompute the working set.
    pub fn apply_filter(&mut self, category: &str) -> Vec<&ExamDescriptor> {
        self.filter = CategoryFilter::parse(category);
        self.recompute();
        self.visible()
    }

    /// Replace the search term and recompute the working set.
    pub fn search(&mut self, term: &str) -> Vec<&ExamDescriptor> {
        self.term = normalize_term(term);
        self.recompute();
        self.visible()
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&ExamDescriptor> {
        self.visible.iter().map(|&i| &self.exams[i]).collect()
    }

    #[must_use]
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn exams(&self) -> &[ExamDescriptor] {
        &self.exams
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ExamDescriptor> {
        self.exams.iter().find(|exam| exam.id.as_str() == id)
    }

    fn recompute(&mut self) {
        let filter = &self.filter;
        let term = self.term.as_str();
        self.visible = self
            .exams
            .iter()
            .enumerate()
            .filter(|(_, exam)| filter.admits(exam))
            .filter(|(_, exam)| term.is_empty() || exam.matches_term(term))
            .map(|(i, _)| i)
            .collect();
    }
}

impl Default for ExamCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[allow(clippy::too_many_arguments)]
fn exam(
    id: &str,
    title: &str,
    description: &str,
    exam_type: ExamType,
    subject: Subject,
    difficulty: Difficulty,
    duration: u32,
    question_count: u32,
    popularity: u8,
    color: &str,
) -> ExamDescriptor {
    ExamDescriptor {
        id: ExamId::new(id),
        title: title.into(),
        description: description.into(),
        exam_type,
        subject,
        difficulty,
        duration,
        question_count,
        popularity,
        color: color.into(),
    }
}

fn builtin_exams() -> Vec<ExamDescriptor> {
    use Difficulty::{Advanced, Intermediate};
    use ExamType::{Jamb, Neco, Waec};
    use Subject::{English, Mathematics, Physics};

    vec![
        exam(
            "waec-math-2024",
            "WAEC Mathematics 2024",
            "Complete WAEC Mathematics past questions with detailed solutions",
            Waec,
            Mathematics,
            Intermediate,
            180,
            80,
            95,
            "#1a365d",
        ),
        exam(
            "jamb-math-2024",
            "JAMB Mathematics 2024",
            "JAMB Mathematics objective questions practice",
            Jamb,
            Mathematics,
            Intermediate,
            100,
            40,
            91,
            "#2d3748",
        ),
        exam(
            "waec-english-2024",
            "WAEC English 2024",
            "WAEC English language comprehensive test",
            Waec,
            English,
            Intermediate,
            190,
            70,
            89,
            "#4a5568",
        ),
        exam(
            "jamb-english-2024",
            "JAMB English 2024",
            "JAMB Use of English comprehensive",
            Jamb,
            English,
            Intermediate,
            120,
            50,
            87,
            "#718096",
        ),
        exam(
            "neco-math-2024",
            "NECO Mathematics 2024",
            "NECO Mathematics theory and objective questions",
            Neco,
            Mathematics,
            Intermediate,
            160,
            60,
            85,
            "#a0aec0",
        ),
        exam(
            "jamb-physics-2024",
            "JAMB Physics 2024",
            "JAMB Physics conceptual and calculation questions",
            Jamb,
            Physics,
            Advanced,
            140,
            45,
            82,
            "#e53e3e",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(exams: &[&ExamDescriptor]) -> Vec<String> {
        exams.iter().map(|e| e.id.to_string()).collect()
    }

    #[test]
    fn starts_with_everything_visible() {
        let catalog = ExamCatalog::builtin();
        assert_eq!(catalog.visible().len(), 6);
    }

    #[test]
    fn filter_by_type_then_search_composes() {
        let mut catalog = ExamCatalog::builtin();
        catalog.apply_filter("jamb");
        let visible = catalog.search("MATH");
        assert_eq!(ids(&visible), vec!["jamb-math-2024"]);
        for exam in &visible {
            assert_eq!(exam.exam_type, ExamType::Jamb);
        }
    }

    #[test]
    fn filter_by_subject() {
        let mut catalog = ExamCatalog::builtin();
        let visible = catalog.apply_filter("english");
        assert_eq!(ids(&visible), vec!["waec-english-2024", "jamb-english-2024"]);
    }

    #[test]
    fn search_survives_filter_change() {
        let mut catalog = ExamCatalog::builtin();
        catalog.search("physics");
        catalog.apply_filter("waec");
        assert!(catalog.visible().is_empty());
        let visible = catalog.apply_filter("all");
        assert_eq!(ids(&visible), vec!["jamb-physics-2024"]);
    }

    #[test]
    fn unknown_category_yields_empty_set() {
        let mut catalog = ExamCatalog::builtin();
        assert!(catalog.apply_filter("weak-areas").is_empty());
    }

    #[test]
    fn category_is_compared_exactly() {
        let mut catalog = ExamCatalog::builtin();
        assert!(catalog.apply_filter("").is_empty());
        assert!(catalog.apply_filter(" jamb ").is_empty());
        assert!(catalog.apply_filter("JAMB").is_empty());
        assert!(catalog.apply_filter("All").is_empty());
        assert_eq!(catalog.apply_filter("jamb").len(), 3);
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
    }

    #[test]
    fn blank_search_clears_term() {
        let mut catalog = ExamCatalog::builtin();
        catalog.search("neco");
        assert_eq!(catalog.visible().len(), 1);
        catalog.search("   ");
        assert_eq!(catalog.term(), "");
        assert_eq!(catalog.visible().len(), 6);
    }

    #[test]
    fn find_by_id() {
        let catalog = ExamCatalog::builtin();
        assert_eq!(
            catalog.find("neco-math-2024").map(|e| e.title.as_str()),
            Some("NECO Mathematics 2024")
        );
        assert!(catalog.find("missing").is_none());
    }
}
