//! In-process repository implementations for development and tests.

pub mod notification;
pub mod user;

pub use notification::MemoryNotificationRepository;
pub use user::MemoryUserDirectory;
