//! Inbound and outbound hub message type definitions.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use natsinternal_core::types::UserId;
use natsinternal_entity::notification::NotificationView;

/// Messages sent by the client to the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Liveness check; answered with [`OutboundMessage::Pong`].
    Ping {
        /// Client timestamp to echo back.
        #[serde(default)]
        timestamp: Option<i64>,
    },
}

/// Messages sent by the hub to the client, framed as
/// `{"event": <name>, "payload": <body>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum OutboundMessage {
    /// Connection accepted and registered.
    Connected {
        /// Connection ID.
        connection_id: Uuid,
        /// Authenticated user.
        user_id: UserId,
    },
    /// A notification addressed to the connected user.
    NotificationDistributed(NotificationView),
    /// Answer to a ping.
    Pong {
        /// Echoed client timestamp, or the server time in milliseconds.
        timestamp: i64,
    },
    /// Error report.
    Error {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
    },
}

impl OutboundMessage {
    /// Answer to a ping, echoing the client timestamp when present.
    pub fn pong(timestamp: Option<i64>) -> Self {
        Self::Pong {
            timestamp: timestamp.unwrap_or_else(|| Utc::now().timestamp_millis()),
        }
    }

    /// Error report with a code.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Name carried in the `event` field.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "Connected",
            Self::NotificationDistributed(_) => "NotificationDistributed",
            Self::Pong { .. } => "Pong",
            Self::Error { .. } => "Error",
        }
    }
}
