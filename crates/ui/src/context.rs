use std::sync::{Arc, Mutex, PoisonError};

use services::{
    AppServices, AuthService, CatalogService, Clock, DashboardService, TestSessionController,
    TestSessionError,
};

use crate::routes::{Route, resolve_test_route};
use crate::vm::{ModalKind, ModalSet, Notice, Toast, ToastCenter, welcome_notice};

pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<AuthService>;
    fn catalog(&self) -> Arc<CatalogService>;
    fn dashboard(&self) -> Arc<DashboardService>;

    /// # Errors
    ///
    /// Returns `TestSessionError` if the exam cannot be loaded.
    fn start_test(&self, exam_id: &str) -> Result<TestSessionController, TestSessionError>;
}

impl UiApp for AppServices {
    fn auth(&self) -> Arc<AuthService> {
        AppServices::auth(self)
    }

    fn catalog(&self) -> Arc<CatalogService> {
        AppServices::catalog(self)
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        AppServices::dashboard(self)
    }

    fn start_test(&self, exam_id: &str) -> Result<TestSessionController, TestSessionError> {
        AppServices::start_test(self, exam_id)
    }
}

/// Page-independent UI state: services plus the toast slot and modal set.
#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    toasts: Arc<Mutex<ToastCenter>>,
    modals: Arc<Mutex<ModalSet>>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: Arc<dyn UiApp>, clock: Clock) -> Self {
        Self {
            app,
            toasts: Arc::new(Mutex::new(ToastCenter::new(clock))),
            modals: Arc::new(Mutex::new(ModalSet::default())),
        }
    }

    #[must_use]
    pub fn app(&self) -> &Arc<dyn UiApp> {
        &self.app
    }

    pub fn notify(&self, notice: Notice) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .show(notice);
    }

    /// The toast on screen now, if any.
    #[must_use]
    pub fn current_toast(&self) -> Option<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current()
            .cloned()
    }

    pub fn with_modals<T>(&self, f: impl FnOnce(&mut ModalSet) -> T) -> T {
        let mut modals = self.modals.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut modals)
    }

    #[must_use]
    pub fn open_modal(&self) -> Option<ModalKind> {
        self.with_modals(|modals| modals.current())
    }

    /// Home page load: greet a returning user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the session cannot be read.
    pub async fn greet(&self) -> Result<(), services::AuthError> {
        if let Some(session) = self.app.auth().current_user().await? {
            self.notify(welcome_notice(&session));
        }
        Ok(())
    }

    /// Enter the test page for `exam`. On failure the error toast is raised
    /// and the route to fall back to is returned.
    ///
    /// # Errors
    ///
    /// Returns the redirect target when the exam is missing or unknown.
    pub fn enter_test(&self, exam: Option<&str>) -> Result<TestSessionController, Route> {
        let catalog = self.app.catalog().catalog();
        let exam_id = resolve_test_route(exam, &catalog).map_err(|redirect| {
            self.notify(redirect.notice);
            redirect.to
        })?;
        self.app.start_test(exam_id.as_str()).map_err(|err| {
            self.notify(Notice::error(err.to_string()));
            Route::exams()
        })
    }
}
