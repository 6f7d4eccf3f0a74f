use std::time::{Duration, Instant};

use crate::host::NotifyLevel;

const INFO_DURATION: Duration = Duration::from_millis(3000);
const ERROR_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
    expires_at: Instant,
}

/// At most one visible notification; a new one replaces the old
#[derive(Debug, Default)]
pub struct NotificationState {
    current: Option<Notification>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, level: NotifyLevel, message: &str) {
        self.show_at(level, message, Instant::now());
    }

    pub fn show_at(&mut self, level: NotifyLevel, message: &str, now: Instant) {
        let duration = match level {
            NotifyLevel::Info => INFO_DURATION,
            NotifyLevel::Warn | NotifyLevel::Error => ERROR_DURATION,
        };
        self.current = Some(Notification {
            level,
            message: message.to_string(),
            expires_at: now + duration,
        });
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Drop the notification once its display time has passed
    pub fn expire(&mut self, now: Instant) {
        if self
            .current
            .as_ref()
            .is_some_and(|notification| now >= notification.expires_at)
        {
            self.current = None;
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
