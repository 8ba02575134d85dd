//! WebSocket message types.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{GigId, UserId};

/// WebSocket message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Subscription acknowledged
    Subscribed,
    /// Freelancer was hired
    Hired,
    /// Error message
    Error,
}

impl WsMessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WsMessageType::Subscribed => "subscribed",
            WsMessageType::Hired => "hired",
            WsMessageType::Error => "error",
        }
    }
}

/// WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Subscription acknowledged
    Subscribed {
        #[serde(rename = "userId")]
        user_id: UserId,
    },

    /// Hire confirmation for the recipient
    Hired {
        message: String,
        #[serde(rename = "gigId")]
        gig_id: GigId,
        #[serde(rename = "gigTitle")]
        gig_title: String,
        timestamp: DateTime<Utc>,
    },

    /// Error message
    Error {
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl WsMessage {
    /// Create a subscription acknowledgement.
    pub fn subscribed(user_id: UserId) -> Self {
        WsMessage::Subscribed { user_id }
    }

    /// Create a hire confirmation referencing the gig title.
    pub fn hired(gig_id: GigId, gig_title: impl Into<String>) -> Self {
        let gig_title = gig_title.into();
        WsMessage::Hired {
            message: format!("You have been hired for \"{}\"", gig_title),
            gig_id,
            gig_title,
            timestamp: Utc::now(),
        }
    }

    /// Create an error message.
    pub fn error(message: impl Into<String>) -> Self {
        WsMessage::Error {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Get the message type.
    pub fn message_type(&self) -> WsMessageType {
        match self {
            WsMessage::Subscribed { .. } => WsMessageType::Subscribed,
            WsMessage::Hired { .. } => WsMessageType::Hired,
            WsMessage::Error { .. } => WsMessageType::Error,
        }
    }
}

/// First client frame on the notification socket.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WsSubscribeRequest {
    /// Identity service bearer token
    pub token: String,
}
