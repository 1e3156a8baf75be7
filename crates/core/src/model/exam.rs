use serde::Serialize;
use std::fmt;

use crate::model::ids::ExamId;

/// Examination body an exam belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamType {
    Waec,
    Jamb,
    Neco,
}

impl ExamType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExamType::Waec => "waec",
            ExamType::Jamb => "jamb",
            ExamType::Neco => "neco",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Mathematics,
    English,
    Physics,
    Chemistry,
    Biology,
}

impl Subject {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Mathematics => "mathematics",
            Subject::English => "english",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
            Subject::Biology => "biology",
        }
    }

    /// Capitalised name used in chart labels and widgets.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Subject::Mathematics => "Mathematics",
            Subject::English => "English",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of an exam offered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDescriptor {
    pub id: ExamId,
    pub title: String,
    pub description: String,
    pub exam_type: ExamType,
    pub subject: Subject,
    pub difficulty: Difficulty,
    /// Nominal duration in minutes.
    pub duration: u32,
    pub question_count: u32,
    pub popularity: u8,
    pub color: String,
}

impl ExamDescriptor {
    /// Exact match of the category against the exam type or subject.
    #[must_use]
    pub fn matches_category(&self, category: &str) -> bool {
        self.exam_type.as_str() == category || self.subject.as_str() == category
    }

    /// Substring match of an already lower-cased term against title, subject and type.
    #[must_use]
    pub fn matches_term(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(term)
            || self.subject.as_str().contains(term)
            || self.exam_type.as_str().contains(term)
    }

    #[must_use]
    pub fn formatted_duration(&self) -> String {
        format_minutes(self.duration)
    }
}

/// `1h 40m` for an hour or more, otherwise `45m`.
#[must_use]
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exam() -> ExamDescriptor {
        ExamDescriptor {
            id: ExamId::new("jamb-physics-2024"),
            title: "JAMB Physics 2024".into(),
            description: "JAMB Physics conceptual and calculation questions".into(),
            exam_type: ExamType::Jamb,
            subject: Subject::Physics,
            difficulty: Difficulty::Advanced,
            duration: 140,
            question_count: 45,
            popularity: 82,
            color: "#e53e3e".into(),
        }
    }

    #[test]
    fn category_matches_type_or_subject() {
        let exam = exam();
        assert!(exam.matches_category("jamb"));
        assert!(exam.matches_category("physics"));
        assert!(!exam.matches_category("waec"));
        assert!(!exam.matches_category("JAMB"));
    }

    #[test]
    fn term_matches_title_case_insensitively() {
        let exam = exam();
        assert!(exam.matches_term("physics 2024"));
        assert!(exam.matches_term("jam"));
        assert!(!exam.matches_term("math"));
    }

    #[test]
    fn minutes_format_with_and_without_hours() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(100), "1h 40m");
        assert_eq!(format_minutes(180), "3h 0m");
    }
}
