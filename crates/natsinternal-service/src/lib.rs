//! # natsinternal-service
//!
//! Notification business logic for NATSInternal. The service layer turns
//! domain events into persisted notifications addressed to the right users,
//! and answers recipients' queries about what they received.
//!
//! Services follow constructor injection: repositories are handed in as
//! `Arc<dyn Trait>` at construction time.

pub mod context;
pub mod notification;

pub use context::RequestContext;
pub use notification::{
    CreatedNotification, NotificationFactory, NotificationFormatter, NotificationRules,
    NotificationService, NotificationStore, RecipientResolver,
};
