//! Per-user push transport.

use std::fmt;
use std::ops::AddAssign;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use natsinternal_core::types::UserId;

use crate::connection::manager::ConnectionManager;
use crate::message::types::OutboundMessage;

/// Outcome of pushing one message to one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Connections the message was queued on.
    pub delivered: usize,
    /// Connections that were closed or full.
    pub failed: usize,
}

impl AddAssign for DeliveryReport {
    fn add_assign(&mut self, other: Self) {
        self.delivered += other.delivered;
        self.failed += other.failed;
    }
}

/// Best-effort, user-addressed message delivery.
#[async_trait]
pub trait PushTransport: Send + Sync + fmt::Debug + 'static {
    /// Push a message to every live connection of a user.
    async fn send_to_user(&self, user_id: UserId, message: &OutboundMessage) -> DeliveryReport;
}

#[async_trait]
impl PushTransport for ConnectionManager {
    async fn send_to_user(&self, user_id: UserId, message: &OutboundMessage) -> DeliveryReport {
        ConnectionManager::send_to_user(self, user_id, message)
    }
}
