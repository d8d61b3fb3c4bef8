//! The ride aggregate.
//!
//! A `Ride` owns its booking requests and reviews. Fields that never change
//! after creation are public; status, requests and reviews are only
//! reachable mutably from inside the crate, so every transition goes
//! through the booking machine or the review module.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingError, BookingId, ReviewId, RideId, UserId, VehicleNumber};

/// Maximum seats a ride may offer.
pub const MAX_CAPACITY: u32 = 8;

/// Ride lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Active,
    Completed,
    Cancelled,
}

impl RideStatus {
    /// Whether no further transition is permitted.
    pub fn is_terminal(self) -> bool {
        !matches!(self, RideStatus::Active)
    }

    /// Whether `self -> next` is a legal move.
    pub fn can_transition_to(self, next: RideStatus) -> bool {
        matches!(
            (self, next),
            (RideStatus::Active, RideStatus::Completed) | (RideStatus::Active, RideStatus::Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Active => "active",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        }
    }
}

/// Booking request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    /// Pending and accepted requests are "open": they block a second request
    /// from the same rider.
    pub fn is_open(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Accepted)
    }

    /// Whether `self -> next` is a legal move.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted) | (Pending, Rejected) | (Pending, Cancelled) | (Accepted, Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// A rider's ask to occupy seats on a ride.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub id: BookingId,
    pub rider_id: UserId,
    pub booked_seats: u32,
    pub requested_at: DateTime<Utc>,
    status: BookingStatus,
}

impl BookingRequest {
    pub(crate) fn pending(rider_id: UserId, booked_seats: u32, requested_at: DateTime<Utc>) -> Self {
        Self {
            id: BookingId::new(),
            rider_id,
            booked_seats,
            requested_at,
            status: BookingStatus::Pending,
        }
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn is_accepted(&self) -> bool {
        self.status == BookingStatus::Accepted
    }

    /// Move to `next`, refusing illegal transitions.
    pub(crate) fn transition(&mut self, next: BookingStatus) -> Result<(), BookingError> {
        if !self.status.can_transition_to(next) {
            return Err(BookingError::InvalidState(format!(
                "booking request is {}, cannot become {}",
                self.status.as_str(),
                next.as_str()
            )));
        }
        self.status = next;
        Ok(())
    }
}

/// A passenger's rating of a completed ride.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub reviewer_id: UserId,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The car offering the seats.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub number: VehicleNumber,
    pub model: String,
}

/// Unvalidated input for posting a ride.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRide {
    pub from: String,
    pub to: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub capacity_seats: u32,
    pub price_per_seat: f64,
    pub description: Option<String>,
    pub vehicle_number: String,
    pub vehicle_model: String,
}

/// A driver-posted offer of seats between two places.
#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    pub id: RideId,
    pub driver_id: UserId,
    pub from: String,
    pub to: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub capacity_seats: u32,
    pub price_per_seat: f64,
    pub description: Option<String>,
    pub vehicle: Vehicle,
    pub created_at: DateTime<Utc>,
    status: RideStatus,
    booking_requests: Vec<BookingRequest>,
    reviews: Vec<Review>,
    average_rating: f64,
}

impl Ride {
    /// Validate `new` and create an active ride owned by `driver_id`.
    pub fn create(
        driver_id: UserId,
        new: NewRide,
        created_at: DateTime<Utc>,
    ) -> Result<Self, BookingError> {
        let from = required(&new.from, "from")?;
        let to = required(&new.to, "to")?;
        let model = required(&new.vehicle_model, "vehicle model")?;

        if !(1..=MAX_CAPACITY).contains(&new.capacity_seats) {
            return Err(BookingError::validation(format!(
                "capacity must be between 1 and {MAX_CAPACITY} seats"
            )));
        }

        if !new.price_per_seat.is_finite() || new.price_per_seat < 0.0 {
            return Err(BookingError::validation(
                "price per seat must be a non-negative number",
            ));
        }

        let number = VehicleNumber::parse_normalized(&new.vehicle_number)
            .map_err(|e| BookingError::validation(e.to_string()))?;

        let description = new
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id: RideId::new(),
            driver_id,
            from,
            to,
            departure_date: new.departure_date,
            departure_time: new.departure_time,
            capacity_seats: new.capacity_seats,
            price_per_seat: new.price_per_seat,
            description,
            vehicle: Vehicle { number, model },
            created_at,
            status: RideStatus::Active,
            booking_requests: Vec::new(),
            reviews: Vec::new(),
            average_rating: 0.0,
        })
    }

    pub fn status(&self) -> RideStatus {
        self.status
    }

    /// Booking requests in the order they were made.
    pub fn booking_requests(&self) -> &[BookingRequest] {
        &self.booking_requests
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Mean review rating, 0 when there are no reviews.
    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    /// Departure as a single sortable instant.
    pub fn departs_at(&self) -> NaiveDateTime {
        self.departure_date.and_time(self.departure_time)
    }

    pub fn booking(&self, id: BookingId) -> Option<&BookingRequest> {
        self.booking_requests.iter().find(|b| b.id == id)
    }

    /// The rider's pending or accepted request, if any.
    pub fn open_booking_for(&self, rider: UserId) -> Option<&BookingRequest> {
        self.booking_requests
            .iter()
            .find(|b| b.rider_id == rider && b.status.is_open())
    }

    /// The rider's most recent request in any state.
    pub fn latest_booking_for(&self, rider: UserId) -> Option<&BookingRequest> {
        self.booking_requests.iter().rev().find(|b| b.rider_id == rider)
    }

    /// Whether the rider has an accepted request on this ride.
    pub fn has_accepted_passenger(&self, rider: UserId) -> bool {
        self.booking_requests
            .iter()
            .any(|b| b.rider_id == rider && b.is_accepted())
    }

    /// Riders whose requests are accepted, in request order.
    pub fn accepted_passengers(&self) -> Vec<UserId> {
        self.booking_requests
            .iter()
            .filter(|b| b.is_accepted())
            .map(|b| b.rider_id)
            .collect()
    }

    pub(crate) fn booking_mut(&mut self, id: BookingId) -> Option<&mut BookingRequest> {
        self.booking_requests.iter_mut().find(|b| b.id == id)
    }

    pub(crate) fn push_booking(&mut self, request: BookingRequest) {
        self.booking_requests.push(request);
    }

    pub(crate) fn push_review(&mut self, review: Review) {
        self.reviews.push(review);
        let total: f64 = self.reviews.iter().map(|r| f64::from(r.rating)).sum();
        self.average_rating = total / self.reviews.len() as f64;
    }

    /// Move the ride to `next`, refusing moves out of terminal states.
    pub(crate) fn transition(&mut self, next: RideStatus) -> Result<(), BookingError> {
        if !self.status.can_transition_to(next) {
            return Err(BookingError::InvalidState(format!(
                "ride is {}, cannot become {}",
                self.status.as_str(),
                next.as_str()
            )));
        }
        self.status = next;
        Ok(())
    }

    /// Refuse the operation unless the ride is still active.
    pub(crate) fn ensure_active(&self) -> Result<(), BookingError> {
        if self.status.is_terminal() {
            return Err(BookingError::InvalidState(format!(
                "ride is {}",
                self.status.as_str()
            )));
        }
        Ok(())
    }
}

fn required(value: &str, field: &str) -> Result<String, BookingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookingError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn create_trims_and_normalises() {
        let mut input = new_ride("  Springfield ", "Shelbyville", 3);
        input.vehicle_number = "ka 09 dx 1234".to_string();
        input.description = Some("   ".to_string());

        let ride = Ride::create(UserId::new(), input, Utc::now()).unwrap();
        assert_eq!(ride.from, "Springfield");
        assert_eq!(ride.vehicle.number.as_str(), "KA09DX1234");
        assert_eq!(ride.description, None);
        assert_eq!(ride.status(), RideStatus::Active);
        assert_eq!(ride.average_rating(), 0.0);
        assert!(ride.booking_requests().is_empty());
    }

    #[test]
    fn create_rejects_bad_capacity() {
        for capacity in [0, 9, 100] {
            let result = Ride::create(UserId::new(), new_ride("A", "B", capacity), Utc::now());
            assert!(matches!(result, Err(BookingError::Validation(_))), "capacity {capacity}");
        }
        assert!(Ride::create(UserId::new(), new_ride("A", "B", 8), Utc::now()).is_ok());
    }

    #[test]
    fn create_rejects_negative_or_nan_price() {
        for price in [-0.01, f64::NAN, f64::INFINITY] {
            let mut input = new_ride("A", "B", 2);
            input.price_per_seat = price;
            assert!(Ride::create(UserId::new(), input, Utc::now()).is_err());
        }
        let mut free = new_ride("A", "B", 2);
        free.price_per_seat = 0.0;
        assert!(Ride::create(UserId::new(), free, Utc::now()).is_ok());
    }

    #[test]
    fn create_requires_endpoints_and_vehicle() {
        assert!(Ride::create(UserId::new(), new_ride(" ", "B", 2), Utc::now()).is_err());
        assert!(Ride::create(UserId::new(), new_ride("A", "", 2), Utc::now()).is_err());

        let mut input = new_ride("A", "B", 2);
        input.vehicle_number = "12345".to_string();
        assert!(Ride::create(UserId::new(), input, Utc::now()).is_err());

        let mut input = new_ride("A", "B", 2);
        input.vehicle_model = String::new();
        assert!(Ride::create(UserId::new(), input, Utc::now()).is_err());
    }

    #[test]
    fn ride_status_transitions() {
        use RideStatus::*;
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Cancelled));
        for terminal in [Completed, Cancelled] {
            assert!(terminal.is_terminal());
            for next in [Active, Completed, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn booking_status_transitions() {
        use BookingStatus::*;
        let legal = [
            (Pending, Accepted),
            (Pending, Rejected),
            (Pending, Cancelled),
            (Accepted, Cancelled),
        ];
        for from in [Pending, Accepted, Rejected, Cancelled] {
            for to in [Pending, Accepted, Rejected, Cancelled] {
                assert_eq!(
                    from.can_transition_to(to),
                    legal.contains(&(from, to)),
                    "{from:?} -> {to:?}"
                );
            }
        }
    }

    #[test]
    fn cancelled_ride_refuses_completion() {
        let mut ride = ride(UserId::new(), 2);
        ride.transition(RideStatus::Cancelled).unwrap();
        assert!(ride.ensure_active().is_err());
        assert!(matches!(
            ride.transition(RideStatus::Completed),
            Err(BookingError::InvalidState(_))
        ));
    }

    #[test]
    fn average_rating_is_running_mean() {
        let mut ride = ride(UserId::new(), 3);
        for rating in [5, 4, 4] {
            ride.push_review(Review {
                id: ReviewId::new(),
                reviewer_id: UserId::new(),
                rating,
                comment: None,
                created_at: Utc::now(),
            });
        }
        assert!((ride.average_rating() - 13.0 / 3.0).abs() < f64::EPSILON);
    }
}
