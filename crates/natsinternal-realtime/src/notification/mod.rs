//! Notification fan-out: the push transport seam and the notifier.

pub mod notifier;
pub mod transport;

pub use notifier::{Notifier, NotifyOutcome};
pub use transport::{DeliveryReport, PushTransport};
