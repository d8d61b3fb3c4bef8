//! Seat accounting.
//!
//! Seats count against capacity only once a request is accepted; pending
//! requests reserve nothing. Every answer is recomputed from the live
//! request list, so callers must ask again after any mutation.

use crate::domain::{BookingRequest, Ride};

/// Seats held by accepted requests.
pub fn accepted_seats(ride: &Ride) -> u32 {
    ride.booking_requests()
        .iter()
        .filter(|b| b.is_accepted())
        .map(|b| b.booked_seats)
        .sum()
}

/// Seats still open to new bookings.
pub fn available_seats(ride: &Ride) -> u32 {
    ride.capacity_seats.saturating_sub(accepted_seats(ride))
}

/// Whether accepting `request` keeps accepted seats within capacity.
pub fn can_accept(ride: &Ride, request: &BookingRequest) -> bool {
    available_seats(ride) >= request.booked_seats
}
