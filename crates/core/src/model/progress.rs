use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::score::ScoreResult;

//
// ─── AVERAGE POLICY ────────────────────────────────────────────────────────────
//

/// How `averageScore` absorbs a new attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AveragePolicy {
    /// `round((previous + latest) / 2)`, or `latest` when the previous average is 0.
    ///
    /// This is a two-point blend, not a mean over all attempts: older
    /// attempts lose weight geometrically.
    #[default]
    Blend,
    /// `round((previous * n + latest) / (n + 1))` over all completed attempts.
    CumulativeMean,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown average policy: {0} (expected `blend` or `mean`)")]
pub struct ParseAveragePolicyError(String);

impl FromStr for AveragePolicy {
    type Err = ParseAveragePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blend" => Ok(Self::Blend),
            "mean" | "cumulative" => Ok(Self::CumulativeMean),
            other => Err(ParseAveragePolicyError(other.to_string())),
        }
    }
}

impl fmt::Display for AveragePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AveragePolicy::Blend => f.write_str("blend"),
            AveragePolicy::CumulativeMean => f.write_str("mean"),
        }
    }
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Cumulative, locally stored summary of a user's test-taking history.
///
/// Missing fields deserialize as zero so partially written records still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default)]
    pub tests_completed: u32,
    #[serde(default)]
    pub average_score: u32,
    /// Total time spent in submitted tests, in seconds.
    #[serde(default)]
    pub study_time: u64,
    #[serde(default)]
    pub study_streak: u32,
    #[serde(default = "epoch", with = "chrono::serde::ts_milliseconds")]
    pub last_active: DateTime<Utc>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl ProgressRecord {
    /// Zero-initialised progress, as written on first login.
    #[must_use]
    pub fn zeroed(now: DateTime<Utc>) -> Self {
        Self {
            tests_completed: 0,
            average_score: 0,
            study_time: 0,
            study_streak: 0,
            last_active: now,
        }
    }

    /// Fold one submitted attempt into the record.
    pub fn record_attempt(&mut self, score: &ScoreResult, now: DateTime<Utc>, policy: AveragePolicy) {
        let previous_count = self.tests_completed;
        self.average_score = match policy {
            AveragePolicy::Blend => {
                if self.average_score == 0 {
                    score.percentage
                } else {
                    round_div(
                        u64::from(self.average_score) + u64::from(score.percentage),
                        2,
                    )
                }
            }
            AveragePolicy::CumulativeMean => round_div(
                u64::from(self.average_score) * u64::from(previous_count)
                    + u64::from(score.percentage),
                u64::from(previous_count) + 1,
            ),
        };
        self.tests_completed = previous_count.saturating_add(1);
        self.study_time = self.study_time.saturating_add(score.time_spent_secs);
        self.last_active = now;
    }
}

/// Integer division rounding halves up. `den` must be non-zero.
fn round_div(num: u64, den: u64) -> u32 {
    let rounded = (2 * num + den) / (2 * den);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
