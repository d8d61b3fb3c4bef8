//! Booking state machine.
//!
//! Each function checks every precondition against the ride as it is right
//! now before changing anything, then applies one transition and returns
//! the event describing it. A refused operation leaves the ride untouched.

use chrono::{DateTime, Utc};

use crate::domain::{Actor, BookingError, BookingId, BookingRequest, BookingStatus, Ride, RideStatus};

use super::events::{ActorRef, RideEvent, RideSummary};
use super::ledger;

/// A rider asks for `seats` seats on `ride`.
///
/// Pending requests do not reserve capacity, so only accepted seats are
/// checked here; the driver's accept re-checks.
pub fn request_booking(
    ride: &mut Ride,
    rider: &Actor,
    seats: u32,
    now: DateTime<Utc>,
) -> Result<RideEvent, BookingError> {
    if rider.id == ride.driver_id {
        return Err(BookingError::SelfBooking);
    }

    if seats == 0 {
        return Err(BookingError::validation("must book at least one seat"));
    }

    ride.ensure_active()?;

    let available = ledger::available_seats(ride);
    if seats > available {
        return Err(BookingError::Capacity {
            requested: seats,
            available,
        });
    }

    if ride.open_booking_for(rider.id).is_some() {
        return Err(BookingError::DuplicateRequest);
    }

    let request = BookingRequest::pending(rider.id, seats, now);
    let booking_id = request.id;
    ride.push_booking(request);

    Ok(RideEvent::BookingRequested {
        ride: RideSummary::of(ride),
        booking_id,
        rider: ActorRef::from(rider),
        seats,
    })
}

/// The driver accepts a pending request, if the seats are still there.
pub fn accept_booking(
    ride: &mut Ride,
    driver: &Actor,
    booking_id: BookingId,
) -> Result<RideEvent, BookingError> {
    ensure_driver(ride, driver, "only the driver can accept bookings")?;
    ride.ensure_active()?;

    let request = pending_request(ride, booking_id)?;
    if !ledger::can_accept(ride, request) {
        return Err(BookingError::Capacity {
            requested: request.booked_seats,
            available: ledger::available_seats(ride),
        });
    }
    let rider_id = request.rider_id;

    flip(ride, booking_id, BookingStatus::Accepted)?;

    Ok(RideEvent::BookingAccepted {
        ride: RideSummary::of(ride),
        booking_id,
        rider_id,
        driver: ActorRef::from(driver),
    })
}

/// The driver turns down a pending request.
pub fn reject_booking(
    ride: &mut Ride,
    driver: &Actor,
    booking_id: BookingId,
) -> Result<RideEvent, BookingError> {
    ensure_driver(ride, driver, "only the driver can reject bookings")?;
    ride.ensure_active()?;

    let rider_id = pending_request(ride, booking_id)?.rider_id;
    flip(ride, booking_id, BookingStatus::Rejected)?;

    Ok(RideEvent::BookingRejected {
        ride: RideSummary::of(ride),
        booking_id,
        rider_id,
        driver: ActorRef::from(driver),
    })
}

/// A rider withdraws their own pending or accepted request.
///
/// Withdrawing an accepted request hands its seats straight back to the
/// pool.
pub fn cancel_booking(
    ride: &mut Ride,
    rider: &Actor,
    booking_id: BookingId,
) -> Result<RideEvent, BookingError> {
    let request = ride
        .booking(booking_id)
        .ok_or(BookingError::BookingNotFound(booking_id))?;

    if request.rider_id != rider.id {
        return Err(BookingError::Authorization(
            "only the rider who made a booking can cancel it",
        ));
    }

    ride.ensure_active()?;

    let released_seats = if request.is_accepted() {
        request.booked_seats
    } else {
        0
    };

    flip(ride, booking_id, BookingStatus::Cancelled)?;

    Ok(RideEvent::BookingCancelled {
        ride: RideSummary::of(ride),
        booking_id,
        rider_id: rider.id,
        released_seats,
    })
}

/// The driver marks the ride as done.
pub fn complete_ride(ride: &mut Ride, driver: &Actor) -> Result<RideEvent, BookingError> {
    ensure_driver(ride, driver, "only the driver can complete the ride")?;
    ride.transition(RideStatus::Completed)?;

    Ok(RideEvent::RideCompleted {
        ride: RideSummary::of(ride),
        passengers: ride.accepted_passengers(),
    })
}

fn ensure_driver(ride: &Ride, actor: &Actor, reason: &'static str) -> Result<(), BookingError> {
    if actor.id != ride.driver_id {
        return Err(BookingError::Authorization(reason));
    }
    Ok(())
}

fn pending_request(ride: &Ride, booking_id: BookingId) -> Result<&BookingRequest, BookingError> {
    ride.booking(booking_id)
        .filter(|b| b.status() == BookingStatus::Pending)
        .ok_or(BookingError::PendingBookingNotFound(booking_id))
}

fn flip(ride: &mut Ride, booking_id: BookingId, next: BookingStatus) -> Result<(), BookingError> {
    ride.booking_mut(booking_id)
        .ok_or(BookingError::BookingNotFound(booking_id))?
        .transition(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserId, fixtures};

    fn people() -> (Actor, Actor, Actor) {
        (
            Actor::new(UserId::new(), "Dana"),
            Actor::new(UserId::new(), "Riya"),
            Actor::new(UserId::new(), "Sam"),
        )
    }

    fn request(ride: &mut Ride, rider: &Actor, seats: u32) -> BookingId {
        match request_booking(ride, rider, seats, Utc::now()).unwrap() {
            RideEvent::BookingRequested { booking_id, .. } => booking_id,
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn request_appends_pending_and_notifies_driver() {
        let (driver, rider, _) = people();
        let mut ride = fixtures::ride(driver.id, 3);

        let event = request_booking(&mut ride, &rider, 2, Utc::now()).unwrap();

        let [booking] = ride.booking_requests() else {
            panic!("expected exactly one request");
        };
        assert_eq!(booking.status(), BookingStatus::Pending);
        assert_eq!(booking.booked_seats, 2);
        assert_eq!(ledger::accepted_seats(&ride), 0);
        assert!(matches!(
            event,
            RideEvent::BookingRequested { seats: 2, ref rider, .. } if rider.name == "Riya"
        ));
    }

    #[test]
    fn driver_cannot_book_own_ride_even_when_full() {
        let (driver, rider, _) = people();
        let mut ride = fixtures::ride(driver.id, 1);
        let id = request(&mut ride, &rider, 1);
        accept_booking(&mut ride, &driver, id).unwrap();
        assert_eq!(ledger::available_seats(&ride), 0);

        assert_eq!(
            request_booking(&mut ride, &driver, 1, Utc::now()),
            Err(BookingError::SelfBooking)
        );

        let mut empty = fixtures::ride(driver.id, 4);
        assert_eq!(
            request_booking(&mut empty, &driver, 1, Utc::now()),
            Err(BookingError::SelfBooking)
        );
    }

    #[test]
    fn request_beyond_available_seats_fails() {
        let (driver, rider, other) = people();
        let mut ride = fixtures::ride(driver.id, 2);
        let id = request(&mut ride, &rider, 2);
        accept_booking(&mut ride, &driver, id).unwrap();

        let result = request_booking(&mut ride, &other, 1, Utc::now());
        assert_eq!(
            result,
            Err(BookingError::Capacity {
                requested: 1,
                available: 0
            })
        );
    }

    #[test]
    fn pending_requests_do_not_reserve_seats() {
        let (driver, rider, other) = people();
        let mut ride = fixtures::ride(driver.id, 2);
        request(&mut ride, &rider, 2);
        assert!(request_booking(&mut ride, &other, 2, Utc::now()).is_ok());
    }

    #[test]
    fn zero_seats_is_invalid() {
        let (driver, rider, _) = people();
        let mut ride = fixtures::ride(driver.id, 2);
        assert!(matches!(
            request_booking(&mut ride, &rider, 0, Utc::now()),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn one_open_request_per_rider() {
        let (driver, rider, _) = people();
        let mut ride = fixtures::ride(driver.id, 4);
        let first = request(&mut ride, &rider, 1);

        assert_eq!(
            request_booking(&mut ride, &rider, 1, Utc::now()),
            Err(BookingError::DuplicateRequest)
        );

        accept_booking(&mut ride, &driver, first).unwrap();
        assert_eq!(
            request_booking(&mut ride, &rider, 1, Utc::now()),
            Err(BookingError::DuplicateRequest)
        );
    }

    #[test]
    fn rejected_or_cancelled_request_allows_rerequest() {
        let (driver, rider, _) = people();
        let mut ride = fixtures::ride(driver.id, 4);

        let first = request(&mut ride, &rider, 1);
        reject_booking(&mut ride, &driver, first).unwrap();
        let second = request(&mut ride, &rider, 1);
        cancel_booking(&mut ride, &rider, second).unwrap();
        request(&mut ride, &rider, 1);

        assert_eq!(ride.booking_requests().len(), 3);
        assert_eq!(
            ride.open_booking_for(rider.id).map(|b| b.status()),
            Some(BookingStatus::Pending)
        );
    }

    #[test]
    fn accept_fails_when_it_would_overbook() {
        let (driver, first, second) = people();
        let third = Actor::new(UserId::new(), "Lee");
        let mut ride = fixtures::ride(driver.id, 4);

        let three = request(&mut ride, &first, 3);
        let two = request(&mut ride, &second, 2);
        let one = request(&mut ride, &third, 1);
        accept_booking(&mut ride, &driver, three).unwrap();

        assert_eq!(
            accept_booking(&mut ride, &driver, two),
            Err(BookingError::Capacity {
                requested: 2,
                available: 1
            })
        );
        assert_eq!(
            ride.booking(two).map(|b| b.status()),
            Some(BookingStatus::Pending)
        );

        accept_booking(&mut ride, &driver, one).unwrap();
        assert_eq!(ledger::accepted_seats(&ride), 4);
        assert_eq!(ledger::available_seats(&ride), 0);
    }

    #[test]
    fn accept_requires_driver() {
        let (driver, rider, other) = people();
        let mut ride = fixtures::ride(driver.id, 2);
        let id = request(&mut ride, &rider, 1);

        assert!(matches!(
            accept_booking(&mut ride, &other, id),
            Err(BookingError::Authorization(_))
        ));
        assert!(matches!(
            reject_booking(&mut ride, &rider, id),
            Err(BookingError::Authorization(_))
        ));
    }

    #[test]
    fn accept_requires_pending_request() {
        let (driver, rider, _) = people();
        let mut ride = fixtures::ride(driver.id, 2);
        let id = request(&mut ride, &rider, 1);
        accept_booking(&mut ride, &driver, id).unwrap();

        assert_eq!(
            accept_booking(&mut ride, &driver, id),
            Err(BookingError::PendingBookingNotFound(id))
        );
        assert!(matches!(
            reject_booking(&mut ride, &driver, BookingId::new()),
            Err(BookingError::PendingBookingNotFound(_))
        ));
    }

    #[test]
    fn refused_operations_leave_ride_unchanged() {
        let (driver, rider, other) = people();
        let mut ride = fixtures::ride(driver.id, 2);
        let a = request(&mut ride, &rider, 2);
        let b = request(&mut ride, &other, 1);
        accept_booking(&mut ride, &driver, a).unwrap();
        let before = ride.clone();

        assert!(matches!(
            accept_booking(&mut ride, &driver, b),
            Err(BookingError::Capacity { .. })
        ));
        assert!(matches!(
            accept_booking(&mut ride, &rider, b),
            Err(BookingError::Authorization(_))
        ));
        assert!(matches!(
            request_booking(&mut ride, &other, 1, Utc::now()),
            Err(BookingError::Capacity { .. })
        ));
        assert!(matches!(
            cancel_booking(&mut ride, &other, a),
            Err(BookingError::Authorization(_))
        ));

        assert_eq!(ride, before);
    }

    #[test]
    fn accept_and_reject_notify_rider() {
        let (driver, rider, other) = people();
        let mut ride = fixtures::ride(driver.id, 2);
        let a = request(&mut ride, &rider, 1);
        let b = request(&mut ride, &other, 1);

        let accepted = accept_booking(&mut ride, &driver, a).unwrap();
        assert!(matches!(
            accepted,
            RideEvent::BookingAccepted { rider_id, .. } if rider_id == rider.id
        ));

        let rejected = reject_booking(&mut ride, &driver, b).unwrap();
        assert!(matches!(
            rejected,
            RideEvent::BookingRejected { rider_id, .. } if rider_id == other.id
        ));
        assert_eq!(ride.booking(b).map(|r| r.status()), Some(BookingStatus::Rejected));
    }

    #[test]
    fn cancelling_accepted_booking_releases_seats() {
        let (driver, rider, other) = people();
        let mut ride = fixtures::ride(driver.id, 2);
        let a = request(&mut ride, &rider, 1);
        let b = request(&mut ride, &other, 1);
        accept_booking(&mut ride, &driver, a).unwrap();
        accept_booking(&mut ride, &driver, b).unwrap();
        assert_eq!(ledger::available_seats(&ride), 0);

        let event = cancel_booking(&mut ride, &rider, a).unwrap();

        assert_eq!(ledger::available_seats(&ride), 1);
        assert!(matches!(
            event,
            RideEvent::BookingCancelled { released_seats: 1, .. }
        ));
    }

    #[test]
    fn cancel_checks_owner_and_state() {
        let (driver, rider, other) = people();
        let mut ride = fixtures::ride(driver.id, 2);
        let id = request(&mut ride, &rider, 1);

        assert!(matches!(
            cancel_booking(&mut ride, &other, id),
            Err(BookingError::Authorization(_))
        ));
        assert!(matches!(
            cancel_booking(&mut ride, &rider, BookingId::new()),
            Err(BookingError::BookingNotFound(_))
        ));

        reject_booking(&mut ride, &driver, id).unwrap();
        assert!(matches!(
            cancel_booking(&mut ride, &rider, id),
            Err(BookingError::InvalidState(_))
        ));
    }

    #[test]
    fn complete_notifies_accepted_passengers_only() {
        let (driver, rider, other) = people();
        let mut ride = fixtures::ride(driver.id, 3);
        let a = request(&mut ride, &rider, 1);
        request(&mut ride, &other, 1);
        accept_booking(&mut ride, &driver, a).unwrap();

        let event = complete_ride(&mut ride, &driver).unwrap();

        assert_eq!(ride.status(), RideStatus::Completed);
        assert!(matches!(
            event,
            RideEvent::RideCompleted { ref passengers, .. } if passengers == &vec![rider.id]
        ));
    }

    #[test]
    fn complete_checks_driver_and_state() {
        let (driver, rider, _) = people();
        let mut ride = fixtures::ride(driver.id, 3);

        assert!(matches!(
            complete_ride(&mut ride, &rider),
            Err(BookingError::Authorization(_))
        ));

        complete_ride(&mut ride, &driver).unwrap();
        assert!(matches!(
            complete_ride(&mut ride, &driver),
            Err(BookingError::InvalidState(_))
        ));
    }

    #[test]
    fn completed_ride_refuses_booking_changes() {
        let (driver, rider, other) = people();
        let mut ride = fixtures::ride(driver.id, 3);
        let id = request(&mut ride, &rider, 1);
        complete_ride(&mut ride, &driver).unwrap();

        assert!(matches!(
            request_booking(&mut ride, &other, 1, Utc::now()),
            Err(BookingError::InvalidState(_))
        ));
        assert!(matches!(
            accept_booking(&mut ride, &driver, id),
            Err(BookingError::InvalidState(_))
        ));
        assert!(matches!(
            cancel_booking(&mut ride, &rider, id),
            Err(BookingError::InvalidState(_))
        ));
    }
}
