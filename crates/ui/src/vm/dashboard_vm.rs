use cbt_core::model::{ActivityEntry, ChartSpec, ImprovementArea, ProgressRecord, Quote};
use services::{DashboardSnapshot, WEAK_AREAS_FILTER};

use crate::routes::Route;
use crate::vm::time_fmt::format_study_time;
use crate::vm::toast_vm::Notice;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatCardsVm {
    pub tests_completed: String,
    pub average_score: String,
    pub study_time: String,
    pub study_streak: String,
}

impl From<&ProgressRecord> for StatCardsVm {
    fn from(progress: &ProgressRecord) -> Self {
        Self {
            tests_completed: progress.tests_completed.to_string(),
            average_score: format!("{}%", progress.average_score),
            study_time: format_study_time(progress.study_time),
            study_streak: format!("{} days", progress.study_streak),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImprovementVm {
    pub subject: String,
    pub topic: String,
    pub score: String,
    pub bar_width_percent: u32,
}

impl From<&ImprovementArea> for ImprovementVm {
    fn from(area: &ImprovementArea) -> Self {
        Self {
            subject: area.subject.clone(),
            topic: area.topic.clone(),
            score: format!("{}%", area.score),
            bar_width_percent: area.score.min(100),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityVm {
    pub icon: &'static str,
    pub headline: String,
    pub score: Option<String>,
    pub when: String,
}

impl From<&ActivityEntry> for ActivityVm {
    fn from(entry: &ActivityEntry) -> Self {
        Self {
            icon: if entry.score.is_some() { "✅" } else { "🟡" },
            headline: format!("{} {}", entry.action.as_str(), entry.exam),
            score: entry.score.map(|score| format!("Score: {score}%")),
            when: entry.when.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardVm {
    pub student_name: Option<String>,
    pub stats: StatCardsVm,
    pub subject_chart: ChartSpec,
    pub progress_chart: ChartSpec,
    pub improvement: Vec<ImprovementVm>,
    pub activity: Vec<ActivityVm>,
}

impl From<&DashboardSnapshot> for DashboardVm {
    fn from(snap: &DashboardSnapshot) -> Self {
        Self {
            student_name: snap.user.as_ref().map(|u| u.username.clone()),
            stats: StatCardsVm::from(&snap.progress),
            subject_chart: snap.subject_chart.clone(),
            progress_chart: snap.progress_chart.clone(),
            improvement: snap.improvement_areas.iter().map(ImprovementVm::from).collect(),
            activity: snap.recent_activity.iter().map(ActivityVm::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteVm {
    pub heading: &'static str,
    pub text: String,
    pub cite: String,
}

impl From<&Quote> for QuoteVm {
    fn from(quote: &Quote) -> Self {
        Self {
            heading: "💡 Daily Motivation",
            text: format!("\"{}\"", quote.content),
            cite: format!("- {}", quote.author),
        }
    }
}

/// The "practice weak areas" button: a toast and a filtered catalog.
#[must_use]
pub fn practice_weak_areas() -> (Notice, Route) {
    (
        Notice::info("Starting practice session for weak areas..."),
        Route::exams_filtered(WEAK_AREAS_FILTER),
    )
}
