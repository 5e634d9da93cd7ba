//! # natsinternal-realtime
//!
//! Real-time notification hub for NATSInternal. Provides:
//!
//! - A per-user registry of live WebSocket connections
//! - The wire message types exchanged with hub clients
//! - The [`Notifier`], which persists a notification and then pushes its
//!   view to every live connection of each recipient

pub mod connection;
pub mod message;
pub mod notification;
pub mod server;

pub use connection::manager::ConnectionManager;
pub use message::types::{InboundMessage, OutboundMessage};
pub use notification::notifier::{Notifier, NotifyOutcome};
pub use notification::transport::{DeliveryReport, PushTransport};
pub use server::RealtimeEngine;
