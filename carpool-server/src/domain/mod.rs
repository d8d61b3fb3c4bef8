//! Domain types for the carpool marketplace.
//!
//! This module contains the core domain model: rides, the booking
//! requests and reviews they own, notifications and identities. Types
//! validate their invariants at construction time, and the mutable parts
//! of a ride are only reachable through the crate's transition functions.

mod error;
mod ids;
mod notification;
mod ride;
mod user;
mod vehicle;

pub use error::{BookingError, ErrorKind};
pub use ids::{BookingId, NotificationId, ReviewId, RideId, UserId};
pub use notification::{Notification, NotificationKind};
pub use ride::{
    BookingRequest, BookingStatus, MAX_CAPACITY, NewRide, Review, Ride, RideStatus, Vehicle,
};
pub use user::{Actor, Role};
pub use vehicle::{InvalidVehicleNumber, VehicleNumber};

#[cfg(test)]
pub(crate) use ride::fixtures;
