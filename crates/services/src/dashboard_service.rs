use cbt_core::model::{
    ActivityAction, ActivityEntry, ChartDataset, ChartKind, ChartSpec, ImprovementArea,
    ProgressRecord, Quote, SessionRecord, Subject,
};

use crate::auth_service::AuthService;
use crate::error::AuthError;
use crate::progress_service::ProgressService;
use crate::quote_service::QuoteService;

/// Catalog filter used by the "practice weak areas" action.
pub const WEAK_AREAS_FILTER: &str = "weak-areas";

const ACCENT: &str = "#FFD700";
const SUBJECT_COLORS: [&str; 5] = ["#1a365d", "#2d3748", "#4a5568", "#718096", "#a0aec0"];

/// Everything the dashboard renders except the quote, which loads separately.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub user: Option<SessionRecord>,
    pub progress: ProgressRecord,
    pub subject_chart: ChartSpec,
    pub progress_chart: ChartSpec,
    pub improvement_areas: Vec<ImprovementArea>,
    pub recent_activity: Vec<ActivityEntry>,
}

#[derive(Clone)]
pub struct DashboardService {
    auth: AuthService,
    progress: ProgressService,
    quotes: QuoteService,
}

impl DashboardService {
    #[must_use]
    pub fn new(auth: AuthService, progress: ProgressService, quotes: QuoteService) -> Self {
        Self {
            auth,
            progress,
            quotes,
        }
    }

    /// Current user, stored progress and the chart/widget data.
    ///
    /// Charts, improvement areas and recent activity are fixed sample series;
    /// only the stat cards reflect stored progress.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the backend cannot be read.
    pub async fn load(&self) -> Result<DashboardSnapshot, AuthError> {
        let user = self.auth.current_user().await?;
        let progress = self.progress.load().await?;
        Ok(DashboardSnapshot {
            user,
            progress,
            subject_chart: subject_chart(),
            progress_chart: progress_chart(),
            improvement_areas: improvement_areas(),
            recent_activity: recent_activity(),
        })
    }

    /// Motivational quote; falls back to a local one on any failure.
    pub async fn quote(&self) -> Quote {
        self.quotes.quote_or_fallback().await
    }
}

#[must_use]
pub fn subject_chart() -> ChartSpec {
    let labels = [
        Subject::Mathematics,
        Subject::English,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
    ]
    .into_iter()
    .map(|s| s.display_name().to_string())
    .collect();

    ChartSpec::percentage(ChartKind::Bar, "Performance by Subject", labels).with_dataset(
        ChartDataset {
            label: "Average Score (%)".into(),
            data: vec![75, 82, 68, 90, 60],
            background_colors: SUBJECT_COLORS.iter().map(|c| (*c).to_string()).collect(),
            border_color: ACCENT.into(),
            border_width: 2,
            fill: false,
            tension: 0.0,
        },
    )
}

#[must_use]
pub fn progress_chart() -> ChartSpec {
    let labels = ["Week 1", "Week 2", "Week 3", "Week 4", "Current"]
        .into_iter()
        .map(String::from)
        .collect();

    ChartSpec::percentage(ChartKind::Line, "Progress Trend", labels).with_dataset(ChartDataset {
        label: "Score Progress".into(),
        data: vec![45, 60, 68, 75, 82],
        background_colors: vec!["rgba(255, 215, 0, 0.1)".into()],
        border_color: ACCENT.into(),
        border_width: 3,
        fill: true,
        tension: 0.4,
    })
}

#[must_use]
pub fn improvement_areas() -> Vec<ImprovementArea> {
    [
        ("Physics", "Quantum Mechanics", 45),
        ("Mathematics", "Calculus", 55),
        ("Chemistry", "Organic Chemistry", 60),
    ]
    .into_iter()
    .map(|(subject, topic, score)| ImprovementArea {
        subject: subject.into(),
        topic: topic.into(),
        score,
    })
    .collect()
}

#[must_use]
pub fn recent_activity() -> Vec<ActivityEntry> {
    [
        (ActivityAction::Completed, "JAMB Mathematics 2024", Some(75), "2 hours ago"),
        (ActivityAction::Started, "WAEC English 2024", None, "1 day ago"),
        (ActivityAction::Completed, "NECO Physics 2023", Some(68), "2 days ago"),
    ]
    .into_iter()
    .map(|(action, exam, score, when)| ActivityEntry {
        action,
        exam: exam.into(),
        score,
        when: when.into(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use cbt_core::model::{AveragePolicy, FALLBACK_QUOTES};
    use cbt_core::time::fixed_clock;
    use storage::records::PROGRESS_KEY;
    use storage::{InMemoryStore, KeyValueStore, LocalRecords};

    use crate::quote_service::QuoteConfig;

    fn service(store: &InMemoryStore, quote_url: &str) -> DashboardService {
        let records = LocalRecords::new(Arc::new(store.clone()));
        let auth = AuthService::new(fixed_clock(), records.clone());
        let progress = ProgressService::new(records, fixed_clock(), AveragePolicy::Blend);
        let quotes = QuoteService::new(QuoteConfig {
            url: quote_url.into(),
            timeout: Duration::from_millis(500),
        });
        DashboardService::new(auth, progress, quotes)
    }

    #[tokio::test]
    async fn load_reads_user_and_progress() {
        let store = InMemoryStore::new();
        store
            .set(PROGRESS_KEY, r#"{"testsCompleted":3,"averageScore":72,"studyTime":5400}"#)
            .await
            .unwrap();
        let dashboard = service(&store, "http://127.0.0.1:9/");
        dashboard.auth.login("alice", "pw").await.unwrap();

        let snap = dashboard.load().await.unwrap();
        assert_eq!(snap.user.map(|u| u.username), Some("alice".into()));
        assert_eq!(snap.progress.tests_completed, 3);
        assert_eq!(snap.progress.average_score, 72);
        assert_eq!(snap.progress.study_time, 5400);
    }

    #[tokio::test]
    async fn corrupt_progress_shows_defaults() {
        let store = InMemoryStore::new();
        store.set(PROGRESS_KEY, "{{").await.unwrap();
        let snap = service(&store, "http://127.0.0.1:9/").load().await.unwrap();
        assert_eq!(snap.progress.tests_completed, 0);
        assert!(snap.user.is_none());
    }

    #[test]
    fn charts_match_sample_series() {
        let bar = subject_chart();
        assert_eq!(bar.kind, ChartKind::Bar);
        assert_eq!(bar.labels[4], "Biology");
        assert_eq!(bar.datasets[0].data, vec![75, 82, 68, 90, 60]);
        assert_eq!(bar.y_max, 100);

        let line = progress_chart();
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["kind"], "line");
        assert_eq!(json["tickSuffix"], "%");
        assert_eq!(json["datasets"][0]["borderColor"], "#FFD700");
        assert_eq!(line.labels.last().map(String::as_str), Some("Current"));
    }

    #[test]
    fn sample_widgets() {
        assert_eq!(improvement_areas()[0].topic, "Quantum Mechanics");
        let activity = recent_activity();
        assert_eq!(activity[1].action, ActivityAction::Started);
        assert_eq!(activity[1].score, None);
    }

    #[tokio::test]
    async fn unreachable_quote_service_falls_back() {
        let store = InMemoryStore::new();
        let quote = service(&store, "http://127.0.0.1:9/").quote().await;
        assert!(
            FALLBACK_QUOTES
                .iter()
                .any(|(content, author)| quote.content == *content && quote.author == *author)
        );
    }
}
