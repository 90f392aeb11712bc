use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

/// User-facing notification target. Fire and forget.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str, title: &str);
}

/// Collects notices raised while handling one request so the response can carry them.
#[derive(Debug, Default)]
pub struct NoticeBuffer {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_notices(self) -> Vec<Notice> {
        self.notices.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NotificationSink for NoticeBuffer {
    fn notify(&self, level: NoticeLevel, message: &str, title: &str) {
        match level {
            NoticeLevel::Success => tracing::debug!("Notice [{title}]: {message}"),
            NoticeLevel::Error => tracing::info!("Error notice [{title}]: {message}"),
        }

        let notice = Notice {
            level,
            title: title.to_string(),
            message: message.to_string(),
        };

        match self.notices.lock() {
            Ok(mut notices) => notices.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}
