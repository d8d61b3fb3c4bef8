//! Notification records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NotificationId, RideId, UserId};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingRequest,
    BookingAccepted,
    BookingRejected,
    RideCompleted,
    ReviewReceived,
}

/// A message in a user's inbox.
///
/// Only `is_read` ever changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    pub kind: NotificationKind,
    pub message: String,
    pub ride_id: Option<RideId>,
    pub actor_id: Option<UserId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// A new unread notification.
    pub fn new(
        recipient: UserId,
        kind: NotificationKind,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            recipient,
            kind,
            message: message.into(),
            ride_id: None,
            actor_id: None,
            is_read: false,
            created_at,
        }
    }

    /// Link to the ride the notification concerns.
    pub fn with_ride(mut self, ride_id: RideId) -> Self {
        self.ride_id = Some(ride_id);
        self
    }

    /// Link to the user whose action caused it.
    pub fn with_actor(mut self, actor_id: UserId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }
}
