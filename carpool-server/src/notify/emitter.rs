//! Turning ride events into inbox messages.

use chrono::{DateTime, Utc};

use crate::booking::RideEvent;
use crate::domain::{Notification, NotificationKind};

/// Build the notifications an event should produce.
///
/// Pure: the same event and timestamp always yield the same recipients,
/// kinds and messages. Cancellations notify nobody.
pub fn render(event: &RideEvent, now: DateTime<Utc>) -> Vec<Notification> {
    match event {
        RideEvent::BookingRequested {
            ride, rider, seats, ..
        } => vec![
            Notification::new(
                ride.driver_id,
                NotificationKind::BookingRequest,
                format!(
                    "{} requested to book {} seat(s) for your ride from {} to {}",
                    rider.name, seats, ride.from, ride.to
                ),
                now,
            )
            .with_ride(ride.id)
            .with_actor(rider.id),
        ],

        RideEvent::BookingAccepted {
            ride,
            rider_id,
            driver,
            ..
        } => vec![
            Notification::new(
                *rider_id,
                NotificationKind::BookingAccepted,
                format!(
                    "Your booking for {} → {} was accepted by {}.",
                    ride.from, ride.to, driver.name
                ),
                now,
            )
            .with_ride(ride.id)
            .with_actor(driver.id),
        ],

        RideEvent::BookingRejected {
            ride,
            rider_id,
            driver,
            ..
        } => vec![
            Notification::new(
                *rider_id,
                NotificationKind::BookingRejected,
                format!(
                    "Your booking for {} → {} was rejected by {}.",
                    ride.from, ride.to, driver.name
                ),
                now,
            )
            .with_ride(ride.id)
            .with_actor(driver.id),
        ],

        RideEvent::BookingCancelled { .. } => Vec::new(),

        RideEvent::RideCompleted { ride, passengers } => passengers
            .iter()
            .map(|passenger| {
                Notification::new(
                    *passenger,
                    NotificationKind::RideCompleted,
                    format!(
                        "The ride from {} to {} has been marked as completed. You can now leave a review!",
                        ride.from, ride.to
                    ),
                    now,
                )
                .with_ride(ride.id)
                .with_actor(ride.driver_id)
            })
            .collect(),

        RideEvent::ReviewReceived {
            ride,
            reviewer,
            rating,
        } => vec![
            Notification::new(
                ride.driver_id,
                NotificationKind::ReviewReceived,
                format!(
                    "{} gave you a {}-star review for your ride from {} to {}.",
                    reviewer.name, rating, ride.from, ride.to
                ),
                now,
            )
            .with_ride(ride.id)
            .with_actor(reviewer.id),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{ActorRef, RideSummary};
    use crate::domain::{BookingId, RideId, UserId};

    fn summary(driver_id: UserId) -> RideSummary {
        RideSummary {
            id: RideId::new(),
            driver_id,
            from: "Springfield".to_string(),
            to: "Shelbyville".to_string(),
        }
    }

    fn actor(name: &str) -> ActorRef {
        ActorRef {
            id: UserId::new(),
            name: name.to_string(),
        }
    }

    #[test]
    fn booking_request_goes_to_driver() {
        let driver = UserId::new();
        let rider = actor("Riya");
        let ride = summary(driver);
        let event = RideEvent::BookingRequested {
            ride: ride.clone(),
            booking_id: BookingId::new(),
            rider: rider.clone(),
            seats: 2,
        };

        let [n] = render(&event, Utc::now()).try_into().unwrap();
        assert_eq!(n.recipient, driver);
        assert_eq!(n.kind, NotificationKind::BookingRequest);
        assert_eq!(
            n.message,
            "Riya requested to book 2 seat(s) for your ride from Springfield to Shelbyville"
        );
        assert_eq!(n.ride_id, Some(ride.id));
        assert_eq!(n.actor_id, Some(rider.id));
        assert!(!n.is_read);
    }

    #[test]
    fn accept_and_reject_go_to_rider() {
        let rider = UserId::new();
        let driver = actor("Dana");

        let accepted = RideEvent::BookingAccepted {
            ride: summary(driver.id),
            booking_id: BookingId::new(),
            rider_id: rider,
            driver: driver.clone(),
        };
        let [n] = render(&accepted, Utc::now()).try_into().unwrap();
        assert_eq!(n.recipient, rider);
        assert_eq!(n.kind, NotificationKind::BookingAccepted);
        assert_eq!(
            n.message,
            "Your booking for Springfield → Shelbyville was accepted by Dana."
        );

        let rejected = RideEvent::BookingRejected {
            ride: summary(driver.id),
            booking_id: BookingId::new(),
            rider_id: rider,
            driver,
        };
        let [n] = render(&rejected, Utc::now()).try_into().unwrap();
        assert_eq!(n.kind, NotificationKind::BookingRejected);
        assert!(n.message.ends_with("was rejected by Dana."));
    }

    #[test]
    fn completion_fans_out_to_every_passenger() {
        let passengers = vec![UserId::new(), UserId::new(), UserId::new()];
        let event = RideEvent::RideCompleted {
            ride: summary(UserId::new()),
            passengers: passengers.clone(),
        };

        let notifications = render(&event, Utc::now());
        let recipients: Vec<_> = notifications.iter().map(|n| n.recipient).collect();
        assert_eq!(recipients, passengers);
        assert!(
            notifications
                .iter()
                .all(|n| n.kind == NotificationKind::RideCompleted)
        );
    }

    #[test]
    fn completion_without_passengers_is_silent() {
        let event = RideEvent::RideCompleted {
            ride: summary(UserId::new()),
            passengers: vec![],
        };
        assert!(render(&event, Utc::now()).is_empty());
    }

    #[test]
    fn review_goes_to_driver() {
        let driver = UserId::new();
        let event = RideEvent::ReviewReceived {
            ride: summary(driver),
            reviewer: actor("Sam"),
            rating: 4,
        };
        let [n] = render(&event, Utc::now()).try_into().unwrap();
        assert_eq!(n.recipient, driver);
        assert_eq!(
            n.message,
            "Sam gave you a 4-star review for your ride from Springfield to Shelbyville."
        );
    }

    #[test]
    fn cancellation_notifies_nobody() {
        let event = RideEvent::BookingCancelled {
            ride: summary(UserId::new()),
            booking_id: BookingId::new(),
            rider_id: UserId::new(),
            released_seats: 1,
        };
        assert!(render(&event, Utc::now()).is_empty());
    }
}
