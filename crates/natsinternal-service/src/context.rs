//! Identity of the caller behind a service call.

use natsinternal_core::types::UserId;

/// The authenticated user a recipient-facing call acts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: UserId,
    /// Name carried in the access token. May be empty.
    pub user_name: String,
}

impl RequestContext {
    pub fn new(user_id: UserId, user_name: impl Into<String>) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
        }
    }
}
