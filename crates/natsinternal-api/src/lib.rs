//! # natsinternal-api
//!
//! HTTP API layer for NATSInternal notifications built on Axum.
//!
//! Provides the recipient-facing notification endpoints, the internal
//! event intake used by the CRUD services, the notification hub WebSocket
//! upgrade, token verification, DTOs, and error mapping.

pub mod auth;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
