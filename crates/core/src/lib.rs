#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod paper;
pub mod time;
pub mod validation;

pub use catalog::{CategoryFilter, ExamCatalog};
pub use paper::{DEFAULT_TIME_BUDGET_SECS, NavigationError, PaperError, TestPaper};
pub use time::Clock;
pub use validation::ValidationError;
