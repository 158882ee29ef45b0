//! Domain types shared by the backend clients and the screens.

pub mod format;
pub mod order;

pub use format::format_timestamp;
pub use order::{OrderStatus, OrderUpdate, ServiceOrder, TimestampWrite};
