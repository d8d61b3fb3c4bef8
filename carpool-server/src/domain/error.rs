//! Booking and review error types.
//!
//! These errors are the refusals a transition can produce. They are
//! distinct from provider and I/O errors, and every one of them leaves the
//! ride exactly as it was.

use serde::Serialize;

use super::{BookingId, RideId};

/// Stable, machine-readable error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Authorization,
    NotFound,
    Capacity,
    SelfBooking,
    DuplicateRequest,
    DuplicateReview,
    InvalidState,
    Conflict,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Authorization => "authorization",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Capacity => "capacity",
            ErrorKind::SelfBooking => "self_booking",
            ErrorKind::DuplicateRequest => "duplicate_request",
            ErrorKind::DuplicateReview => "duplicate_review",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::Conflict => "conflict",
        }
    }
}

/// Why a ride operation was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    /// Malformed input
    #[error("invalid input: {0}")]
    Validation(String),

    /// Actor is not entitled to perform the operation
    #[error("not permitted: {0}")]
    Authorization(&'static str),

    /// No such ride
    #[error("ride {0} not found")]
    RideNotFound(RideId),

    /// No booking request with this id on the ride
    #[error("booking request {0} not found on this ride")]
    BookingNotFound(BookingId),

    /// No pending booking request with this id on the ride
    #[error("no pending booking request {0} on this ride")]
    PendingBookingNotFound(BookingId),

    /// Would push accepted seats above capacity
    #[error("not enough seats: requested {requested}, available {available}")]
    Capacity { requested: u32, available: u32 },

    /// Driver tried to book their own ride
    #[error("drivers cannot book their own ride")]
    SelfBooking,

    /// Rider already holds a pending or accepted request
    #[error("you already have an open booking request for this ride")]
    DuplicateRequest,

    /// Reviewer already reviewed this ride
    #[error("you have already reviewed this ride")]
    DuplicateReview,

    /// Operation not legal for the current ride or request status
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Lost a race with a concurrent write
    #[error("conflict: {0}")]
    Conflict(String),
}

impl BookingError {
    /// Stable classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::Validation(_) => ErrorKind::Validation,
            BookingError::Authorization(_) => ErrorKind::Authorization,
            BookingError::RideNotFound(_)
            | BookingError::BookingNotFound(_)
            | BookingError::PendingBookingNotFound(_) => ErrorKind::NotFound,
            BookingError::Capacity { .. } => ErrorKind::Capacity,
            BookingError::SelfBooking => ErrorKind::SelfBooking,
            BookingError::DuplicateRequest => ErrorKind::DuplicateRequest,
            BookingError::DuplicateReview => ErrorKind::DuplicateReview,
            BookingError::InvalidState(_) => ErrorKind::InvalidState,
            BookingError::Conflict(_) => ErrorKind::Conflict,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        BookingError::Validation(message.into())
    }
}
