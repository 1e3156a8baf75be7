use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use cbt_core::ExamCatalog;
use cbt_core::model::{ExamDescriptor, ExamId};
use tokio::sync::watch;

use crate::auth_service::AuthService;
use crate::error::CatalogError;
use crate::schedule::Debouncer;

/// What the caller needs to open the test page for a chosen exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamLaunch {
    pub exam_id: ExamId,
    pub title: String,
}

struct CatalogState {
    catalog: Mutex<ExamCatalog>,
    visible: watch::Sender<Vec<ExamDescriptor>>,
}

impl CatalogState {
    /// Mutate the catalog and publish the resulting working set.
    fn update(&self, f: impl FnOnce(&mut ExamCatalog)) -> Vec<ExamDescriptor> {
        let visible: Vec<ExamDescriptor> = {
            let mut catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut catalog);
            catalog.visible().into_iter().cloned().collect()
        };
        self.visible.send_replace(visible.clone());
        visible
    }

    fn read<T>(&self, f: impl FnOnce(&ExamCatalog) -> T) -> T {
        let catalog = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
        f(&catalog)
    }
}

/// Filterable, searchable exam list with a published working set.
///
/// Every change to the working set is sent on a watch channel; subscribers
/// re-render from the latest value.
pub struct CatalogService {
    state: Arc<CatalogState>,
    debouncer: Debouncer,
}

impl CatalogService {
    #[must_use]
    pub fn new(catalog: ExamCatalog, search_debounce: Duration) -> Self {
        let initial = catalog.visible().into_iter().cloned().collect();
        let (visible, _) = watch::channel(initial);
        Self {
            state: Arc::new(CatalogState {
                catalog: Mutex::new(catalog),
                visible,
            }),
            debouncer: Debouncer::new(search_debounce),
        }
    }

    #[must_use]
    pub fn builtin(search_debounce: Duration) -> Self {
        Self::new(ExamCatalog::builtin(), search_debounce)
    }

    /// Receiver for the visible exam list; the current value is available immediately.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<ExamDescriptor>> {
        self.state.visible.subscribe()
    }

    /// `"all"` shows every exam; anything else matches type or subject exactly.
    pub fn apply_filter(&self, category: &str) -> Vec<ExamDescriptor> {
        tracing::debug!(category, "catalog filter");
        self.state.update(|catalog| {
            catalog.apply_filter(category);
        })
    }

    /// Immediate search; composes with the active filter.
    pub fn search(&self, term: &str) -> Vec<ExamDescriptor> {
        self.state.update(|catalog| {
            catalog.search(term);
        })
    }

    /// Search after the quiet period. A newer call replaces a pending one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn search_debounced(&self, term: impl Into<String>) {
        let term = term.into();
        let state = Arc::clone(&self.state);
        self.debouncer.call(move || {
            tracing::debug!(term = %term, "catalog search");
            state.update(|catalog| {
                catalog.search(&term);
            });
        });
    }

    pub fn cancel_pending_search(&self) {
        self.debouncer.cancel();
    }

    #[must_use]
    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }

    #[must_use]
    pub fn visible(&self) -> Vec<ExamDescriptor> {
        self.state
            .read(|catalog| catalog.visible().into_iter().cloned().collect())
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<ExamDescriptor> {
        self.state.read(|catalog| catalog.find(id).cloned())
    }

    /// Snapshot of the full catalog, including filter and term.
    #[must_use]
    pub fn catalog(&self) -> ExamCatalog {
        self.state.read(ExamCatalog::clone)
    }

    /// One-line summary: `"<title>: N questions, Xh Ym duration"`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownExam` if the id is not in the catalog.
    pub fn exam_details(&self, id: &str) -> Result<String, CatalogError> {
        let exam = self
            .find(id)
            .ok_or_else(|| CatalogError::UnknownExam(id.to_string()))?;
        Ok(format!(
            "{}: {} questions, {} duration",
            exam.title,
            exam.question_count,
            exam.formatted_duration()
        ))
    }

    /// Resolve an exam for launch. Requires a logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotAuthenticated` without a session,
    /// `CatalogError::UnknownExam` for an id not in the catalog, and
    /// `CatalogError::Auth` if the session cannot be read.
    pub async fn start_exam(&self, auth: &AuthService, id: &str) -> Result<ExamLaunch, CatalogError> {
        if !auth.is_authenticated().await? {
            return Err(CatalogError::NotAuthenticated);
        }
        let exam = self
            .find(id)
            .ok_or_else(|| CatalogError::UnknownExam(id.to_string()))?;
        tracing::info!(exam_id = %exam.id, "starting exam");
        Ok(ExamLaunch {
            exam_id: exam.id,
            title: exam.title,
        })
    }
}
