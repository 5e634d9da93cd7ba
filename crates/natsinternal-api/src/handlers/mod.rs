//! HTTP and WebSocket handlers.

pub mod health;
pub mod hub;
pub mod notification;
