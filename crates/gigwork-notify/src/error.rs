//! Notification error types.

use thiserror::Error;

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Recipient not subscribed: {0}")]
    NotSubscribed(String),

    #[error("Publish failed: {0}")]
    PublishFailed(String),
}

impl NotifyError {
    pub fn not_subscribed(recipient: impl Into<String>) -> Self {
        Self::NotSubscribed(recipient.into())
    }

    pub fn publish_failed(msg: impl Into<String>) -> Self {
        Self::PublishFailed(msg.into())
    }
}
