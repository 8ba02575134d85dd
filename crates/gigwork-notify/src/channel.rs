//! Notification channel interface and in-process hub.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::sync::RwLock;
use tracing::debug;

use gigwork_models::{UserId, WsMessage};

use crate::error::{NotifyError, NotifyResult};

/// Per-recipient buffer size. A lagging receiver drops the oldest
/// messages rather than blocking publishers.
const CHANNEL_CAPACITY: usize = 64;

/// Publish interface addressed by recipient identity.
///
/// Implementations are best-effort: a publish that cannot be delivered
/// returns an error the caller is expected to log and move past, never
/// propagate into its own result.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Publish a message to a recipient.
    async fn publish(&self, recipient: &UserId, payload: WsMessage) -> NotifyResult<()>;
}

/// In-process fan-out hub.
///
/// Each recipient with at least one live subscription holds a
/// broadcast sender; entries are pruned when the last subscriber
/// detaches.
#[derive(Default)]
pub struct NotificationHub {
    senders: RwLock<HashMap<UserId, broadcast::Sender<WsMessage>>>,
}

impl NotificationHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a recipient. Multiple concurrent subscriptions per
    /// recipient all receive every message.
    pub async fn subscribe(&self, recipient: &UserId) -> broadcast::Receiver<WsMessage> {
        let mut senders = self.senders.write().await;
        match senders.get(recipient) {
            Some(tx) => tx.subscribe(),
            None => {
                let (tx, rx) = broadcast::channel(CHANNEL_CAPACITY);
                senders.insert(recipient.clone(), tx);
                debug!("Subscribed recipient {}", recipient);
                rx
            }
        }
    }

    /// Drop the recipient's sender once its last subscriber detached.
    /// Called by connection handlers on teardown.
    pub async fn unsubscribe(&self, recipient: &UserId) {
        let mut senders = self.senders.write().await;
        if let Some(tx) = senders.get(recipient) {
            if tx.receiver_count() == 0 {
                senders.remove(recipient);
                debug!("Pruned recipient {}", recipient);
            }
        }
    }

    /// Number of live subscriptions for a recipient.
    pub async fn subscriber_count(&self, recipient: &UserId) -> usize {
        let senders = self.senders.read().await;
        senders
            .get(recipient)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl NotificationChannel for NotificationHub {
    async fn publish(&self, recipient: &UserId, payload: WsMessage) -> NotifyResult<()> {
        let senders = self.senders.read().await;
        let tx = senders
            .get(recipient)
            .ok_or_else(|| NotifyError::not_subscribed(recipient.as_str()))?;

        // send only fails when no receiver is alive.
        tx.send(payload)
            .map(|_| ())
            .map_err(|_| NotifyError::not_subscribed(recipient.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigwork_models::GigId;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let hub = NotificationHub::new();
        let user = UserId::from("user-1");
        let mut rx = hub.subscribe(&user).await;

        hub.publish(&user, WsMessage::hired(GigId::from("g1"), "Logo design"))
            .await
            .unwrap();

        let msg = rx.recv().await.unwrap();
        match msg {
            WsMessage::Hired { gig_title, .. } => assert_eq!(gig_title, "Logo design"),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscriber_is_not_subscribed() {
        let hub = NotificationHub::new();
        let err = hub
            .publish(&UserId::from("ghost"), WsMessage::error("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::NotSubscribed(_)));
    }

    #[tokio::test]
    async fn test_all_subscriptions_receive() {
        let hub = NotificationHub::new();
        let user = UserId::from("user-1");
        let mut rx1 = hub.subscribe(&user).await;
        let mut rx2 = hub.subscribe(&user).await;

        hub.publish(&user, WsMessage::subscribed(user.clone()))
            .await
            .unwrap();

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_unsubscribe_prunes_idle_recipient() {
        let hub = NotificationHub::new();
        let user = UserId::from("user-1");
        let rx = hub.subscribe(&user).await;
        assert_eq!(hub.subscriber_count(&user).await, 1);

        drop(rx);
        hub.unsubscribe(&user).await;
        assert_eq!(hub.subscriber_count(&user).await, 0);

        let err = hub
            .publish(&user, WsMessage::error("gone"))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::NotSubscribed(_)));
    }
}
