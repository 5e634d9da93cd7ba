//! Notification domain entities.

pub mod event;
pub mod kind;
pub mod model;
pub mod view;

pub use event::NotificationEvent;
pub use kind::{NotificationAction, NotificationResource, NotificationType};
pub use model::{NewNotification, Notification, NotificationReceipt, ReceivedNotification};
pub use view::NotificationView;
