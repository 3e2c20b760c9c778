//! User-facing notifications raised by the controllers.

use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A short message for the toast layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Sending half of a notification queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notification>,
}

/// Create a notifier and the queue it feeds.
#[must_use]
pub fn channel() -> (Notifier, mpsc::UnboundedReceiver<Notification>) {
    let (sender, receiver) = mpsc::unbounded_channel();

    (Notifier { sender }, receiver)
}

impl Notifier {
    pub fn success(&self, message: impl Into<String>) {
        self.send(NotificationKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(NotificationKind::Error, message.into());
    }

    fn send(&self, kind: NotificationKind, message: String) {
        if self.sender.send(Notification { kind, message }).is_err() {
            debug!("notification dropped, no listener");
        }
    }
}

/// Drain everything queued so far.
pub fn drain(receiver: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut drained = Vec::new();

    while let Ok(notification) = receiver.try_recv() {
        drained.push(notification);
    }

    drained
}
