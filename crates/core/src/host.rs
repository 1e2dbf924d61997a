// Host seam: how the core talks back to the embedding environment.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing operation outcome.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

pub trait Host: Send + Sync {
    /// Show an informational or error notice to the user.
    fn notify(&self, notice: Notice);

    /// Rebuild the display hierarchy. Called after every successful mutation.
    fn refresh_tree(&self);
}

/// Host that records what it was asked to do. Useful for embedding tests.
#[derive(Debug, Default)]
pub struct MemoryHost {
    notices: Mutex<Vec<Notice>>,
    refreshes: AtomicUsize,
}

impl MemoryHost {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|notices| notices.clone()).unwrap_or_default()
    }

    pub fn last_notice(&self) -> Option<Notice> {
        self.notices().pop()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl Host for MemoryHost {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }

    fn refresh_tree(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}
