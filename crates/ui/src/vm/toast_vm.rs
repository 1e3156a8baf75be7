use chrono::{DateTime, Duration, Utc};
use services::Clock;

/// Toasts stay up this long unless replaced.
pub const TOAST_LIFETIME_SECS: i64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub fn background(self) -> &'static str {
        match self {
            ToastKind::Success => "#28A745",
            ToastKind::Error => "#e53e3e",
            ToastKind::Info => "#1a365d",
            ToastKind::Warning => "#FFD700",
        }
    }

    #[must_use]
    pub fn text_color(self) -> &'static str {
        match self {
            ToastKind::Warning => "#1a365d",
            _ => "white",
        }
    }
}

/// A message waiting to be shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: ToastKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, message)
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Warning, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub notice: Notice,
    pub shown_at: DateTime<Utc>,
}

impl Toast {
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.shown_at + Duration::seconds(TOAST_LIFETIME_SECS)
    }
}

/// Single-slot notification area: a new toast replaces the old one.
#[derive(Clone, Debug)]
pub struct ToastCenter {
    clock: Clock,
    current: Option<Toast>,
}

impl ToastCenter {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            current: None,
        }
    }

    pub fn show(&mut self, notice: Notice) {
        self.current = Some(Toast {
            notice,
            shown_at: self.clock.now(),
        });
    }

    /// The visible toast, if it has not expired by now.
    pub fn current(&mut self) -> Option<&Toast> {
        let now = self.clock.now();
        self.current_at(now)
    }

    /// The visible toast at `now`; expired toasts are dropped.
    pub fn current_at(&mut self, now: DateTime<Utc>) -> Option<&Toast> {
        if self.current.as_ref().is_some_and(|t| now >= t.expires_at()) {
            self.current = None;
        }
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
