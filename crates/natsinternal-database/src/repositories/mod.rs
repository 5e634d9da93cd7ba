//! Repository traits consumed by the service layer, with their PostgreSQL
//! implementations.

pub mod notification;
pub mod user;

pub use notification::{NotificationRepository, PgNotificationRepository};
pub use user::{PgUserDirectory, UserDirectory};
