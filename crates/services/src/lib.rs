#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod catalog_service;
pub mod config;
pub mod dashboard_service;
pub mod error;
pub mod progress_service;
pub mod quote_service;
pub mod schedule;
pub mod sessions;

pub use cbt_core::Clock;

pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use catalog_service::{CatalogService, ExamLaunch};
pub use config::AppConfig;
pub use dashboard_service::{DashboardService, DashboardSnapshot, WEAK_AREAS_FILTER};
pub use error::{AppServicesError, AuthError, CatalogError, QuoteError, TestSessionError};
pub use progress_service::ProgressService;
pub use quote_service::{QuoteConfig, QuoteService};
pub use schedule::{Debouncer, TimerHandle};
pub use sessions::{
    ReviewItem, SessionEvent, SessionProgress, SessionSnapshot, SessionState, SubmitTrigger,
    TestSessionController,
};
