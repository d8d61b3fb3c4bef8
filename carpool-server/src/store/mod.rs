//! In-memory persistence for rides and notifications.

mod notifications;
mod rides;

pub use notifications::{INBOX_LIMIT, NotificationError, NotificationStore};
pub use rides::RideStore;
