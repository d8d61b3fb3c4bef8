//! Ride booking lifecycle.
//!
//! Seat accounting (`ledger`), booking and ride transitions (`machine`) and
//! review submission (`review`). Every successful transition returns a
//! [`RideEvent`] that the notification layer turns into inbox messages.

pub mod ledger;
pub mod machine;
pub mod review;

mod events;

pub use events::{ActorRef, RideEvent, RideSummary};
