//! # natsinternal-database
//!
//! Persistence for the NATSInternal notification subsystem: PostgreSQL
//! connection management, embedded migrations, the repository traits the
//! service layer consumes, and their PostgreSQL and in-memory
//! implementations.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;

pub use connection::DatabasePool;
pub use provider::DatabaseProvider;
pub use repositories::{NotificationRepository, UserDirectory};
