//! User Notices
//!
//! Toast-style messages for things the user should hear about but that do
//! not interrupt the screen, such as a drop that failed to persist.

use chrono::{DateTime, Local};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    CommitFailed { item: String, reason: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::CommitFailed { item, reason } => {
                write!(f, "Could not move {}: {}", item, reason)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    pub raised_at: DateTime<Local>,
}

#[derive(Clone)]
pub struct NoticeSender {
    tx: mpsc::UnboundedSender<Toast>,
}

impl NoticeSender {
    pub fn raise(&self, notice: Notice) {
        let toast = Toast {
            notice,
            raised_at: Local::now(),
        };
        if let Err(e) = self.tx.send(toast) {
            tracing::warn!("nobody listening for notice: {}", e.0.notice);
        }
    }
}

pub fn notice_channel() -> (NoticeSender, mpsc::UnboundedReceiver<Toast>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NoticeSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_raise_delivers_toast() {
        let (sender, mut rx) = notice_channel();
        sender.raise(Notice::CommitFailed {
            item: "Tent".into(),
            reason: "Not found: Membership 9 not found".into(),
        });
        let toast = rx.recv().await.unwrap();
        assert_eq!(
            toast.notice.to_string(),
            "Could not move Tent: Not found: Membership 9 not found"
        );
    }

    #[test]
    fn test_raise_without_listener_does_not_panic() {
        let (sender, rx) = notice_channel();
        drop(rx);
        sender.raise(Notice::CommitFailed {
            item: "Tent".into(),
            reason: "gone".into(),
        });
    }
}
