mod controller;
mod events;
mod machine;
mod progress;

// Public API of the test session subsystem.
pub use crate::error::TestSessionError;
pub use controller::TestSessionController;
pub use events::{SessionEvent, SubmitTrigger};
pub use machine::{ReviewItem, SessionSnapshot, SessionState, TestSession, Tick};
pub use progress::SessionProgress;
