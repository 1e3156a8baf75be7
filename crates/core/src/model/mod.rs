mod answers;
pub mod dashboard;
mod exam;
mod ids;
mod progress;
pub mod question;
mod quote;
mod score;
mod user;

pub use answers::{AnswerError, AnswerMap};
pub use dashboard::{ActivityAction, ActivityEntry, ChartDataset, ChartKind, ChartSpec, ImprovementArea};
pub use exam::{Difficulty, ExamDescriptor, ExamType, Subject, format_minutes};
pub use ids::{ExamId, ParseIdError, QuestionId, UserId};
pub use progress::{AveragePolicy, ParseAveragePolicyError, ProgressRecord};
pub use question::{Question, QuestionDifficulty, QuestionError, option_index, option_letter};
pub use quote::{FALLBACK_QUOTES, Quote, fallback_quote};
pub use score::{ScoreResult, rounded_percentage};
pub use user::{SessionRecord, UserRecord};
