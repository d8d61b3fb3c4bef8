//! Notification emission.
//!
//! `emitter` maps a [`RideEvent`](crate::booking::RideEvent) to the
//! notifications it should produce; `dispatcher` delivers them once the
//! transition behind the event has been committed.

mod dispatcher;
pub mod emitter;

pub use dispatcher::{NotificationSink, Notifier};
