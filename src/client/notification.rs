use std::time::{Duration, Instant};

use serde::Serialize;

pub const DISMISS_AFTER: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Error, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Info, message: message.into() }
    }
}

/// Holds at most one notification; a newer one replaces it and it expires on its own.
#[derive(Debug)]
pub struct NotificationSlot {
    current: Option<(Notification, Instant)>,
    ttl: Duration,
}

impl Default for NotificationSlot {
    fn default() -> Self {
        Self::with_ttl(DISMISS_AFTER)
    }
}

impl NotificationSlot {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn show(&mut self, notification: Notification) {
        self.show_at(notification, Instant::now());
    }

    pub fn show_at(&mut self, notification: Notification, now: Instant) {
        tracing::debug!(kind = ?notification.kind, "{}", notification.message);
        self.current = Some((notification, now));
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<&Notification> {
        match &self.current {
            Some((n, shown)) if now.saturating_duration_since(*shown) < self.ttl => Some(n),
            _ => None,
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
