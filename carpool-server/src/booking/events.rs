//! Events produced by committed ride transitions.

use crate::domain::{Actor, BookingId, Ride, RideId, UserId};

/// The parts of a ride that messages refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideSummary {
    pub id: RideId,
    pub driver_id: UserId,
    pub from: String,
    pub to: String,
}

impl RideSummary {
    pub fn of(ride: &Ride) -> Self {
        Self {
            id: ride.id,
            driver_id: ride.driver_id,
            from: ride.from.clone(),
            to: ride.to.clone(),
        }
    }
}

/// Who caused an event, as it should be named to others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorRef {
    pub id: UserId,
    pub name: String,
}

impl From<&Actor> for ActorRef {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id,
            name: actor.display_name().to_string(),
        }
    }
}

/// Something that happened to a ride.
#[derive(Debug, Clone, PartialEq)]
pub enum RideEvent {
    BookingRequested {
        ride: RideSummary,
        booking_id: BookingId,
        rider: ActorRef,
        seats: u32,
    },
    BookingAccepted {
        ride: RideSummary,
        booking_id: BookingId,
        rider_id: UserId,
        driver: ActorRef,
    },
    BookingRejected {
        ride: RideSummary,
        booking_id: BookingId,
        rider_id: UserId,
        driver: ActorRef,
    },
    BookingCancelled {
        ride: RideSummary,
        booking_id: BookingId,
        rider_id: UserId,
        /// Seats returned to the pool (0 if the request was still pending).
        released_seats: u32,
    },
    RideCompleted {
        ride: RideSummary,
        passengers: Vec<UserId>,
    },
    ReviewReceived {
        ride: RideSummary,
        reviewer: ActorRef,
        rating: u8,
    },
}

impl RideEvent {
    pub fn ride(&self) -> &RideSummary {
        match self {
            RideEvent::BookingRequested { ride, .. }
            | RideEvent::BookingAccepted { ride, .. }
            | RideEvent::BookingRejected { ride, .. }
            | RideEvent::BookingCancelled { ride, .. }
            | RideEvent::RideCompleted { ride, .. }
            | RideEvent::ReviewReceived { ride, .. } => ride,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            RideEvent::BookingRequested { .. } => "booking_requested",
            RideEvent::BookingAccepted { .. } => "booking_accepted",
            RideEvent::BookingRejected { .. } => "booking_rejected",
            RideEvent::BookingCancelled { .. } => "booking_cancelled",
            RideEvent::RideCompleted { .. } => "ride_completed",
            RideEvent::ReviewReceived { .. } => "review_received",
        }
    }
}
