use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient notification for the UI to display and drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: Option<String>,
}

/// Queue of notices not yet shown.
#[derive(Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn success(&mut self, title: impl Into<String>) {
        let title = title.into();
        tracing::info!("{}", title);
        self.queue.push_back(Notice {
            level: NoticeLevel::Success,
            title,
            message: None,
        });
    }

    pub fn error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        let title = title.into();
        let message = message.into();
        tracing::error!("{}: {}", title, message);
        self.queue.push_back(Notice {
            level: NoticeLevel::Error,
            title,
            message: Some(message),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Hands every pending notice to the caller.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }
}
