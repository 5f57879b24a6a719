/*!
 * Notification Queue
 *
 * Holds at most one live transient message. Every post replaces the current
 * message and restarts its expiry timer; superseded messages are discarded.
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::debug;

/// Default lifetime of a notification
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Capacity of the posted-notification event channel
const EVENT_CAPACITY: usize = 64;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A transient message shown to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub text: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

struct QueueInner {
    ttl: Duration,
    current: watch::Sender<Option<Notification>>,
    events: broadcast::Sender<Notification>,
    expiry: Mutex<Option<JoinHandle<()>>>,
    next_id: AtomicU64,
}

/// Single-slot notification sink shared by every component of a session
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<QueueInner>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl std::fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationQueue")
            .field("ttl", &self.inner.ttl)
            .field("current", &*self.inner.current.borrow())
            .finish()
    }
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        let (current, _) = watch::channel(None);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(QueueInner {
                ttl,
                current,
                events,
                expiry: Mutex::new(None),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Replace the live notification and restart the expiry timer.
    pub fn post(&self, text: impl Into<String>, kind: NotificationKind) -> Notification {
        let notification = Notification {
            id: self.inner.next_id.fetch_add(1, Ordering::SeqCst),
            text: text.into(),
            kind,
            created_at: Utc::now(),
        };
        debug!(kind = kind.label(), text = %notification.text, "notification posted");

        self.inner.current.send_replace(Some(notification.clone()));
        let _ = self.inner.events.send(notification.clone());
        self.schedule_expiry(notification.id);

        notification
    }

    pub fn info(&self, text: impl Into<String>) -> Notification {
        self.post(text, NotificationKind::Info)
    }

    pub fn success(&self, text: impl Into<String>) -> Notification {
        self.post(text, NotificationKind::Success)
    }

    pub fn warning(&self, text: impl Into<String>) -> Notification {
        self.post(text, NotificationKind::Warning)
    }

    pub fn error(&self, text: impl Into<String>) -> Notification {
        self.post(text, NotificationKind::Error)
    }

    /// Remove the live notification immediately.
    pub fn clear(&self) {
        if let Some(handle) = self.inner.expiry.lock().take() {
            handle.abort();
        }
        self.inner.current.send_replace(None);
    }

    /// The live notification, if any
    pub fn current(&self) -> Option<Notification> {
        self.inner.current.borrow().clone()
    }

    /// Observe the live notification slot
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.current.subscribe()
    }

    /// Observe every posted notification, including ones superseded before expiry
    pub fn events(&self) -> broadcast::Receiver<Notification> {
        self.inner.events.subscribe()
    }

    fn schedule_expiry(&self, id: u64) {
        let mut slot = self.inner.expiry.lock();
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(id, "no runtime available, notification will not expire on its own");
            return;
        };

        let weak: Weak<QueueInner> = Arc::downgrade(&self.inner);
        let ttl = self.inner.ttl;
        *slot = Some(runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = weak.upgrade() {
                inner.current.send_if_modified(|current| {
                    let expired = current.as_ref().is_some_and(|n| n.id == id);
                    if expired {
                        *current = None;
                    }
                    expired
                });
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_without_runtime_keeps_message() {
        let queue = NotificationQueue::default();
        queue.error("Please select an adapter");

        let current = queue.current().unwrap();
        assert_eq!(current.kind, NotificationKind::Error);
        assert_eq!(current.text, "Please select an adapter");
    }

    #[test]
    fn test_post_replaces_previous() {
        let queue = NotificationQueue::default();
        let first = queue.info("Scanning for networks...");
        let second = queue.success("Found 3 networks");

        assert!(second.id > first.id);
        assert_eq!(queue.current().unwrap().text, "Found 3 networks");
    }

    #[test]
    fn test_clear_is_immediate() {
        let queue = NotificationQueue::default();
        queue.warning("Handshake capture failed");
        queue.clear();
        assert!(queue.current().is_none());
    }

    #[test]
    fn test_events_see_every_post() {
        let queue = NotificationQueue::default();
        let mut events = queue.events();

        queue.info("one");
        queue.info("two");

        assert_eq!(events.try_recv().unwrap().text, "one");
        assert_eq!(events.try_recv().unwrap().text, "two");
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_expires_after_ttl() {
        let queue = NotificationQueue::new(Duration::from_secs(5));
        queue.success("Deauth attack completed successfully");

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(queue.current().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(queue.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_post_restarts_timer() {
        let queue = NotificationQueue::new(Duration::from_secs(5));
        queue.info("Capturing handshake...");

        tokio::time::sleep(Duration::from_secs(3)).await;
        queue.success("Handshake captured successfully!");

        // The first message's deadline passes without clearing the second
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(
            queue.current().unwrap().text,
            "Handshake captured successfully!"
        );

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(queue.current().is_none());
    }

    #[tokio::test]
    async fn test_subscribe_observes_changes() {
        let queue = NotificationQueue::default();
        let mut rx = queue.subscribe();

        queue.error("Scan failed: connection refused");
        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow().as_ref().map(|n| n.kind),
            Some(NotificationKind::Error)
        );
    }
}
