//! # natsinternal-entity
//!
//! Domain entity models for the NATSInternal notification subsystem. Every
//! struct in this crate represents a database table row or a domain value
//! object. Database entities additionally derive `sqlx::FromRow`.

pub mod notification;
pub mod user;
