//! Environment-driven application configuration.

use std::env;
use std::time::Duration;

use cbt_core::DEFAULT_TIME_BUDGET_SECS;
use cbt_core::model::AveragePolicy;

use crate::quote_service::QuoteConfig;

pub const DEFAULT_DB_URL: &str = "sqlite://cbt.sqlite3";
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_url: String,
    pub quote: QuoteConfig,
    pub average_policy: AveragePolicy,
    pub time_budget_secs: u32,
    pub search_debounce: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.into(),
            quote: QuoteConfig::default(),
            average_policy: AveragePolicy::default(),
            time_budget_secs: DEFAULT_TIME_BUDGET_SECS,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl AppConfig {
    /// Read `CBT_*` variables from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; invalid values are logged and
    /// replaced by defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let db_url = lookup("CBT_DB_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.db_url);

        let average_policy = match lookup("CBT_AVERAGE_POLICY") {
            None => defaults.average_policy,
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                tracing::warn!(%err, "falling back to default average policy");
                defaults.average_policy
            }),
        };

        let time_budget_secs = match lookup("CBT_TEST_MINUTES") {
            None => defaults.time_budget_secs,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(minutes) if minutes > 0 => minutes.saturating_mul(60),
                _ => {
                    tracing::warn!(value = %raw, "ignoring invalid CBT_TEST_MINUTES");
                    defaults.time_budget_secs
                }
            },
        };

        Self {
            db_url,
            quote: QuoteConfig::from_lookup(&lookup),
            average_policy,
            time_budget_secs,
            search_debounce: defaults.search_debounce,
        }
    }

    #[must_use]
    pub fn with_db_url(mut self, db_url: impl Into<String>) -> Self {
        self.db_url = db_url.into();
        self
    }
}
