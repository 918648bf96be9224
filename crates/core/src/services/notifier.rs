//! Notification sink.
//!
//! Delivery is fire-and-forget: moderation actions log and swallow
//! notification failures rather than blocking on them.

use civimod_common::AppResult;
use civimod_db::entities::content::ContentStatus;

/// Events the moderation core can emit toward a user.
#[derive(Debug, Clone)]
pub enum ModerationEvent {
    /// The user's content was reviewed.
    ContentReviewed {
        content_id: String,
        status: ContentStatus,
    },
    /// The user was banned.
    Banned { reason: String },
    /// The user's ban was lifted.
    Unbanned,
}

/// Notification sink trait.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver an event to a user. Callers never treat failure as fatal.
    async fn notify(&self, user_id: &str, event: ModerationEvent) -> AppResult<()>;
}

/// Default sink that records events in the structured log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user_id: &str, event: ModerationEvent) -> AppResult<()> {
        tracing::info!(user_id = %user_id, event = ?event, "Notification emitted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let notifier = LogNotifier;
        notifier
            .notify(
                "user1",
                ModerationEvent::ContentReviewed {
                    content_id: "content1".to_string(),
                    status: ContentStatus::Removed,
                },
            )
            .await
            .unwrap();
    }
}
