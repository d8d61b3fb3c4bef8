//! Per-user notification inboxes.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::{Notification, NotificationId, UserId};
use crate::notify::NotificationSink;

/// Most notifications returned by a single listing.
pub const INBOX_LIMIT: usize = 50;

/// Errors from inbox operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotificationError {
    /// No notification with this id in the caller's inbox
    #[error("notification {0} not found")]
    NotFound(NotificationId),

    /// Delivery could not be completed
    #[error("notification delivery failed: {0}")]
    Unavailable(String),
}

/// All inboxes, keyed by recipient.
#[derive(Debug, Default)]
pub struct NotificationStore {
    inboxes: RwLock<HashMap<UserId, Vec<Notification>>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's most recent notifications, newest first.
    pub async fn list_for(&self, user: UserId) -> Vec<Notification> {
        let inboxes = self.inboxes.read().await;
        let Some(inbox) = inboxes.get(&user) else {
            return Vec::new();
        };

        let mut listed = inbox.clone();
        // Inboxes are append-only, so a stable sort keeps later arrivals
        // ahead of earlier ones with the same timestamp once reversed.
        listed.sort_by_key(|n| n.created_at);
        listed.reverse();
        listed.truncate(INBOX_LIMIT);
        listed
    }

    pub async fn unread_count(&self, user: UserId) -> usize {
        self.inboxes
            .read()
            .await
            .get(&user)
            .map_or(0, |inbox| inbox.iter().filter(|n| !n.is_read).count())
    }

    /// Mark one of the user's notifications read.
    pub async fn mark_read(
        &self,
        user: UserId,
        id: NotificationId,
    ) -> Result<Notification, NotificationError> {
        let mut inboxes = self.inboxes.write().await;
        let notification = inboxes
            .get_mut(&user)
            .and_then(|inbox| inbox.iter_mut().find(|n| n.id == id))
            .ok_or(NotificationError::NotFound(id))?;

        notification.is_read = true;
        Ok(notification.clone())
    }

    /// Mark every notification in the user's inbox read. Returns how many
    /// changed.
    pub async fn mark_all_read(&self, user: UserId) -> usize {
        let mut inboxes = self.inboxes.write().await;
        let Some(inbox) = inboxes.get_mut(&user) else {
            return 0;
        };

        let mut changed = 0;
        for notification in inbox.iter_mut().filter(|n| !n.is_read) {
            notification.is_read = true;
            changed += 1;
        }
        changed
    }

    pub async fn delete(&self, user: UserId, id: NotificationId) -> Result<(), NotificationError> {
        let mut inboxes = self.inboxes.write().await;
        let inbox = inboxes
            .get_mut(&user)
            .ok_or(NotificationError::NotFound(id))?;

        let before = inbox.len();
        inbox.retain(|n| n.id != id);
        if inbox.len() == before {
            return Err(NotificationError::NotFound(id));
        }
        Ok(())
    }
}

impl NotificationSink for NotificationStore {
    async fn deliver(&self, notifications: Vec<Notification>) -> Result<(), NotificationError> {
        if notifications.is_empty() {
            return Ok(());
        }

        let mut inboxes = self.inboxes.write().await;
        for notification in notifications {
            inboxes
                .entry(notification.recipient)
                .or_default()
                .push(notification);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::NotificationKind;

    fn note(recipient: UserId, minutes_ago: i64) -> Notification {
        Notification::new(
            recipient,
            NotificationKind::BookingRequest,
            format!("{minutes_ago} minutes ago"),
            Utc::now() - Duration::minutes(minutes_ago),
        )
    }

    #[tokio::test]
    async fn list_is_newest_first_and_capped() {
        let store = NotificationStore::new();
        let user = UserId::new();
        for minutes_ago in (0..60).rev() {
            store.deliver(vec![note(user, minutes_ago)]).await.unwrap();
        }

        let listed = store.list_for(user).await;
        assert_eq!(listed.len(), INBOX_LIMIT);
        assert_eq!(listed[0].message, "0 minutes ago");
        assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn inboxes_are_private() {
        let store = NotificationStore::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let for_alice = note(alice, 1);
        let id = for_alice.id;
        store.deliver(vec![for_alice]).await.unwrap();

        assert!(store.list_for(bob).await.is_empty());
        assert_eq!(
            store.mark_read(bob, id).await,
            Err(NotificationError::NotFound(id))
        );
        assert_eq!(
            store.delete(bob, id).await,
            Err(NotificationError::NotFound(id))
        );
        assert_eq!(store.unread_count(alice).await, 1);
    }

    #[tokio::test]
    async fn read_tracking() {
        let store = NotificationStore::new();
        let user = UserId::new();
        let first = note(user, 3);
        let first_id = first.id;
        store.deliver(vec![first]).await.unwrap();
        store.deliver(vec![note(user, 2)]).await.unwrap();
        store.deliver(vec![note(user, 1)]).await.unwrap();
        assert_eq!(store.unread_count(user).await, 3);

        let read = store.mark_read(user, first_id).await.unwrap();
        assert!(read.is_read);
        assert_eq!(store.unread_count(user).await, 2);

        assert_eq!(store.mark_all_read(user).await, 2);
        assert_eq!(store.unread_count(user).await, 0);
        assert_eq!(store.mark_all_read(user).await, 0);
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let store = NotificationStore::new();
        let user = UserId::new();
        let n = note(user, 1);
        let id = n.id;
        store.deliver(vec![n]).await.unwrap();

        store.delete(user, id).await.unwrap();
        assert!(store.list_for(user).await.is_empty());
        assert_eq!(
            store.delete(user, id).await,
            Err(NotificationError::NotFound(id))
        );
    }

    #[tokio::test]
    async fn deliver_routes_by_recipient() {
        let store = NotificationStore::new();
        let alice = UserId::new();
        let bob = UserId::new();

        store
            .deliver(vec![note(alice, 1), note(bob, 1), note(alice, 0)])
            .await
            .unwrap();

        assert_eq!(store.list_for(alice).await.len(), 2);
        assert_eq!(store.list_for(bob).await.len(), 1);
    }
}
