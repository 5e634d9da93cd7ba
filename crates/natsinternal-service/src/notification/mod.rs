//! Notification creation, recipient rules, and recipient-facing queries.

pub mod factory;
pub mod formatter;
pub mod rules;
pub mod service;
pub mod store;

pub use factory::NotificationFactory;
pub use formatter::NotificationFormatter;
pub use rules::{
    AllActiveUsers, NotificationRules, PermissionHolders, PermissionHoldersAndSubject,
    RecipientResolver,
};
pub use service::NotificationService;
pub use store::{CreatedNotification, NotificationStore};
