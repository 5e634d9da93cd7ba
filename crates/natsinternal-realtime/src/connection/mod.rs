//! WebSocket connection management: lifecycle, pool, handles.

pub mod handle;
pub mod manager;
pub mod pool;

pub use handle::{ConnectionHandle, ConnectionId, SendError};
pub use manager::ConnectionManager;
pub use pool::ConnectionPool;
