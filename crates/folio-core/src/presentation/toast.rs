use std::time::{Duration, Instant};

/// How long a notification stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A short-lived success or error notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

impl Toast {
    pub fn success(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            shown_at: now,
        }
    }

    pub fn error(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            shown_at: now,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= TOAST_DURATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expiry() {
        let now = Instant::now();
        let toast = Toast::success("Saved", now);
        assert!(!toast.is_error());
        assert!(!toast.is_expired(now + Duration::from_millis(4999)));
        assert!(toast.is_expired(now + TOAST_DURATION));
    }

    #[test]
    fn test_error_toast() {
        let toast = Toast::error("Session expired - please login again", Instant::now());
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(toast.is_error());
    }
}
