//! Transient notifications (toasts)
//!
//! Every workflow outcome lands here: successes as confirmations, failures
//! as error toasts. Frontends drain the feed and render it however they
//! like. The feed is bounded; old entries fall off the front.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// How many toasts the feed retains.
const FEED_CAPACITY: usize = 32;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToastLevel {
    /// Informational / success
    Info,
    /// Something degraded but recoverable
    Warning,
    /// An operation failed
    Error,
}

/// One transient notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Severity
    pub level: ToastLevel,
    /// Message to render
    pub message: String,
}

/// Cloneable handle to the bounded toast feed.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    feed: Arc<Mutex<VecDeque<Toast>>>,
}

impl Notifications {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a toast, evicting the oldest entry when full.
    pub fn push(&self, level: ToastLevel, message: impl Into<String>) {
        let mut feed = self.feed.lock();
        if feed.len() == FEED_CAPACITY {
            feed.pop_front();
        }
        feed.push_back(Toast {
            level,
            message: message.into(),
        });
    }

    /// Push an informational/success toast.
    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    /// Push an error toast.
    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    /// Remove and return every queued toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.feed.lock().drain(..).collect()
    }

    /// Number of queued toasts.
    pub fn len(&self) -> usize {
        self.feed.lock().len()
    }

    /// Whether the feed is empty.
    pub fn is_empty(&self) -> bool {
        self.feed.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain_preserve_order() {
        let feed = Notifications::new();
        feed.info("plan submitted");
        feed.error("item rejection failed");
        let toasts = feed.drain();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].level, ToastLevel::Info);
        assert_eq!(toasts[1].level, ToastLevel::Error);
        assert!(feed.is_empty());
    }

    #[test]
    fn test_feed_is_bounded() {
        let feed = Notifications::new();
        for i in 0..(FEED_CAPACITY + 5) {
            feed.info(format!("toast {i}"));
        }
        assert_eq!(feed.len(), FEED_CAPACITY);
        let toasts = feed.drain();
        // The oldest five fell off the front.
        assert_eq!(toasts[0].message, "toast 5");
    }
}
