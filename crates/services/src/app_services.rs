use std::sync::Arc;

use cbt_core::TestPaper;
use storage::{LocalRecords, Storage};

use crate::Clock;
use crate::auth_service::AuthService;
use crate::catalog_service::CatalogService;
use crate::config::AppConfig;
use crate::dashboard_service::DashboardService;
use crate::error::{AppServicesError, TestSessionError};
use crate::progress_service::ProgressService;
use crate::quote_service::QuoteService;
use crate::sessions::TestSessionController;

/// Assembles app-facing services over one store.
#[derive(Clone)]
pub struct AppServices {
    config: AppConfig,
    auth: Arc<AuthService>,
    catalog: Arc<CatalogService>,
    progress: Arc<ProgressService>,
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Wire services over an existing store.
    #[must_use]
    pub fn new(storage: &Storage, config: AppConfig, clock: Clock) -> Self {
        let records = LocalRecords::new(Arc::clone(&storage.kv));
        let auth = AuthService::new(clock, records.clone());
        let progress = ProgressService::new(records, clock, config.average_policy);
        let quotes = QuoteService::new(config.quote.clone());
        let dashboard = DashboardService::new(auth.clone(), progress.clone(), quotes);
        let catalog = CatalogService::builtin(config.search_debounce);

        Self {
            config,
            auth: Arc::new(auth),
            catalog: Arc::new(catalog),
            progress: Arc::new(progress),
            dashboard: Arc::new(dashboard),
        }
    }

    /// Build services backed by `SQLite` storage at `config.db_url`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(config: AppConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        tracing::debug!(db_url = %config.db_url, "opened local store");
        Ok(Self::new(&storage, config, clock))
    }

    #[must_use]
    pub fn in_memory(config: AppConfig, clock: Clock) -> Self {
        Self::new(&Storage::in_memory(), config, clock)
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    /// Load the paper for `exam_id` and start its countdown.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `TestSessionError::Paper` for a blank or unknown exam id.
    pub fn start_test(&self, exam_id: &str) -> Result<TestSessionController, TestSessionError> {
        let paper = TestPaper::for_exam(
            &self.catalog.catalog(),
            exam_id,
            self.config.time_budget_secs,
        )?;
        TestSessionController::start(paper, (*self.progress).clone())
    }
}
