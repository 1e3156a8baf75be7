mod auth_vm;
mod dashboard_vm;
mod exam_card_vm;
mod modal_vm;
mod results_vm;
mod test_vm;
mod time_fmt;
mod toast_vm;

pub use auth_vm::{
    FILL_ALL_FIELDS, FormOutcome, LoginForm, RegisterForm, auth_link_label,
    logout_notice, submit_login, submit_register, welcome_notice,
};
pub use dashboard_vm::{
    ActivityVm, DashboardVm, ImprovementVm, QuoteVm, StatCardsVm, practice_weak_areas,
};
pub use exam_card_vm::{ExamCardVm, NO_RESULTS, map_exam_cards};
pub use modal_vm::{ModalKind, ModalSet};
pub use results_vm::{ResultsVm, ReviewLineVm};
pub use test_vm::{
    LOW_TIME_SECS, OptionVm, PaletteButtonVm, TestIntent, TestOutcome,
    TestScreenVm, apply_intent, finished_results,
};
pub use time_fmt::{format_countdown, format_study_time};
pub use toast_vm::{Notice, TOAST_LIFETIME_SECS, Toast, ToastCenter, ToastKind};
