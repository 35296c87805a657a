//! Transient, dismissible notifications raised by the services.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

/// Default time a notice stays visible
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub level: NoticeLevel,
    pub duration: Duration,
    pub raised_at: Instant,
}

impl Notice {
    pub fn expires_at(&self) -> Instant {
        self.raised_at + self.duration
    }
}

/// Shared queue of notices. Clones refer to the same queue.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    queue: Arc<Mutex<VecDeque<Notice>>>,
    duration: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_DURATION)
    }
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            duration,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Notice>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(
        &self,
        level: NoticeLevel,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Uuid {
        let notice = Notice {
            id: Uuid::new_v4(),
            title: title.into(),
            description,
            level,
            duration: self.duration,
            raised_at: Instant::now(),
        };
        let id = notice.id;
        self.lock().push_back(notice);
        id
    }

    pub fn info(&self, title: impl Into<String>) -> Uuid {
        self.push(NoticeLevel::Info, title, None)
    }

    pub fn warning(&self, title: impl Into<String>) -> Uuid {
        self.push(NoticeLevel::Warning, title, None)
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) -> Uuid {
        self.push(NoticeLevel::Error, title, Some(description.into()))
    }

    /// Snapshot of the queued notices, oldest first
    pub fn pending(&self) -> Vec<Notice> {
        self.lock().iter().cloned().collect()
    }

    /// Remove and return every queued notice
    pub fn drain(&self) -> Vec<Notice> {
        self.lock().drain(..).collect()
    }

    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut queue = self.lock();
        let before = queue.len();
        queue.retain(|notice| notice.id != id);
        queue.len() != before
    }

    /// Drop notices whose duration elapsed at `now`
    pub fn expire(&self, now: Instant) -> usize {
        let mut queue = self.lock();
        let before = queue.len();
        queue.retain(|notice| notice.expires_at() > now);
        before - queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_queue() {
        let board = NoticeBoard::default();
        let clone = board.clone();

        clone.warning("Please Enter something in search");
        board.error("Error Occured!", "Failed to Load the Search Results");

        let notices = board.pending();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(notices[1].description.as_deref(), Some("Failed to Load the Search Results"));
        assert_eq!(notices[1].duration, DEFAULT_NOTICE_DURATION);

        assert_eq!(clone.drain().len(), 2);
        assert!(board.is_empty());
    }

    #[test]
    fn dismiss_removes_one() {
        let board = NoticeBoard::default();
        let first = board.info("one");
        board.info("two");

        assert!(board.dismiss(first));
        assert!(!board.dismiss(first));
        assert_eq!(board.pending()[0].title, "two");
    }

    #[tokio::test(start_paused = true)]
    async fn expire_drops_elapsed_notices() {
        let board = NoticeBoard::new(Duration::from_secs(1));
        board.info("short lived");

        assert_eq!(board.expire(Instant::now()), 0);
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(board.expire(Instant::now()), 1);
        assert!(board.is_empty());
    }
}
