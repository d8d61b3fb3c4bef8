//! Delivering rendered notifications after a transition commits.

use std::future::Future;

use chrono::Utc;
use tracing::{debug, error};

use crate::booking::RideEvent;
use crate::domain::Notification;
use crate::store::NotificationError;

use super::emitter;

/// Somewhere notifications can be delivered.
pub trait NotificationSink: Send + Sync {
    fn deliver(
        &self,
        notifications: Vec<Notification>,
    ) -> impl Future<Output = Result<(), NotificationError>> + Send;
}

/// Renders events and hands them to a sink.
///
/// Delivery failures are logged and swallowed: the transition that produced
/// the event has already been committed and is not rolled back.
#[derive(Debug)]
pub struct Notifier<S> {
    sink: S,
}

impl<S: NotificationSink> Notifier<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Deliver the notifications for each event in order.
    pub async fn publish(&self, events: &[RideEvent]) {
        let now = Utc::now();
        for event in events {
            let notifications = emitter::render(event, now);
            if notifications.is_empty() {
                continue;
            }

            let count = notifications.len();
            match self.sink.deliver(notifications).await {
                Ok(()) => debug!(
                    event = event.name(),
                    ride = %event.ride().id,
                    count,
                    "Delivered notifications"
                ),
                Err(e) => error!(
                    event = event.name(),
                    ride = %event.ride().id,
                    error = %e,
                    "Failed to deliver notifications"
                ),
            }
        }
    }
}
