//! Review eligibility and rating aggregation.

use chrono::{DateTime, Utc};

use crate::domain::{Actor, BookingError, Review, ReviewId, Ride, RideStatus};

use super::events::{ActorRef, RideEvent, RideSummary};

/// Lowest and highest accepted rating.
pub const RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// An accepted passenger reviews a completed ride.
///
/// On success the ride's average rating is the plain mean of all ratings
/// so far.
pub fn submit_review(
    ride: &mut Ride,
    reviewer: &Actor,
    rating: i64,
    comment: Option<String>,
    now: DateTime<Utc>,
) -> Result<RideEvent, BookingError> {
    if ride.status() != RideStatus::Completed {
        return Err(BookingError::InvalidState(
            "only completed rides can be reviewed".to_string(),
        ));
    }

    if !ride.has_accepted_passenger(reviewer.id) {
        return Err(BookingError::Authorization(
            "only accepted passengers can review this ride",
        ));
    }

    if ride.reviews().iter().any(|r| r.reviewer_id == reviewer.id) {
        return Err(BookingError::DuplicateReview);
    }

    let rating = u8::try_from(rating)
        .ok()
        .filter(|r| RATING_RANGE.contains(&i64::from(*r)))
        .ok_or_else(|| BookingError::validation("rating must be between 1 and 5"))?;

    let comment = comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    ride.push_review(Review {
        id: ReviewId::new(),
        reviewer_id: reviewer.id,
        rating,
        comment,
        created_at: now,
    });

    Ok(RideEvent::ReviewReceived {
        ride: RideSummary::of(ride),
        reviewer: ActorRef::from(reviewer),
        rating,
    })
}
