//! Data transfer objects for web requests and responses.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::ledger;
use crate::domain::{
    BookingId, BookingRequest, BookingStatus, NewRide, Notification, NotificationId,
    NotificationKind, Review, Ride, RideId, RideStatus, UserId,
};
use crate::search::{MatchKind, RideMatch, RideQuery, SearchResults};

use super::error::AppError;

/// Request to post a ride.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRideRequest {
    pub from: String,
    pub to: String,
    pub departure_date: NaiveDate,
    /// `HH:MM` or `HH:MM:SS`
    pub departure_time: String,
    #[serde(alias = "availableSeats")]
    pub capacity_seats: u32,
    pub price_per_seat: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub vehicle_number: String,
    pub vehicle_model: String,
}

impl CreateRideRequest {
    pub fn into_new_ride(self) -> Result<NewRide, AppError> {
        let departure_time = parse_time(&self.departure_time)?;
        Ok(NewRide {
            from: self.from,
            to: self.to,
            departure_date: self.departure_date,
            departure_time,
            capacity_seats: self.capacity_seats,
            price_per_seat: self.price_per_seat,
            description: self.description,
            vehicle_number: self.vehicle_number,
            vehicle_model: self.vehicle_model,
        })
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, AppError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| AppError::BadRequest {
            message: format!("invalid departure time {s:?}, expected HH:MM"),
        })
}

/// Request to book seats.
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    #[serde(default = "one_seat")]
    pub seats: u32,
}

fn one_seat() -> u32 {
    1
}

/// Request naming a booking request on a ride.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingActionRequest {
    pub request_id: BookingId,
}

/// Request to review a completed ride.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Search query string. Blank values count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_seats: Option<String>,
}

impl SearchParams {
    pub fn into_query(self) -> Result<RideQuery, AppError> {
        Ok(RideQuery {
            date: parse_param(&self.date, "date", |s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
            })?,
            min_price: parse_param(&self.min_price, "minPrice", |s| s.parse().ok())?,
            max_price: parse_param(&self.max_price, "maxPrice", |s| s.parse().ok())?,
            min_seats: parse_param(&self.min_seats, "minSeats", |s| s.parse().ok())?,
            from: non_blank(self.from),
            to: non_blank(self.to),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_param<T>(
    value: &Option<String>,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, AppError> {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse(raw).map(Some).ok_or_else(|| AppError::BadRequest {
            message: format!("invalid {name}: {raw:?}"),
        }),
    }
}

/// A booking request as shown to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResult {
    pub id: BookingId,
    pub rider_id: UserId,
    pub booked_seats: u32,
    pub status: BookingStatus,
    pub requested_at: DateTime<Utc>,
}

impl BookingResult {
    pub fn from_booking(booking: &BookingRequest) -> Self {
        Self {
            id: booking.id,
            rider_id: booking.rider_id,
            booked_seats: booking.booked_seats,
            status: booking.status(),
            requested_at: booking.requested_at,
        }
    }
}

/// A review as shown to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    pub id: crate::domain::ReviewId,
    pub reviewer_id: UserId,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ReviewResult {
    pub fn from_review(review: &Review) -> Self {
        Self {
            id: review.id,
            reviewer_id: review.reviewer_id,
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: review.created_at,
        }
    }
}

/// A ride as shown to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideResult {
    pub id: RideId,
    pub driver_id: UserId,
    pub from: String,
    pub to: String,
    pub departure_date: NaiveDate,
    /// `HH:MM`
    pub departure_time: String,
    pub capacity_seats: u32,
    /// Capacity minus accepted seats
    pub available_seats: u32,
    pub price_per_seat: f64,
    pub description: Option<String>,
    pub vehicle_number: String,
    pub vehicle_model: String,
    pub status: RideStatus,
    pub average_rating: f64,
    pub booking_requests: Vec<BookingResult>,
    pub reviews: Vec<ReviewResult>,
    pub created_at: DateTime<Utc>,
}

impl RideResult {
    pub fn from_ride(ride: &Ride) -> Self {
        Self {
            id: ride.id,
            driver_id: ride.driver_id,
            from: ride.from.clone(),
            to: ride.to.clone(),
            departure_date: ride.departure_date,
            departure_time: ride.departure_time.format("%H:%M").to_string(),
            capacity_seats: ride.capacity_seats,
            available_seats: ledger::available_seats(ride),
            price_per_seat: ride.price_per_seat,
            description: ride.description.clone(),
            vehicle_number: ride.vehicle.number.to_string(),
            vehicle_model: ride.vehicle.model.clone(),
            status: ride.status(),
            average_rating: ride.average_rating(),
            booking_requests: ride
                .booking_requests()
                .iter()
                .map(BookingResult::from_booking)
                .collect(),
            reviews: ride.reviews().iter().map(ReviewResult::from_review).collect(),
            created_at: ride.created_at,
        }
    }
}

/// A ride in search results.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(flatten)]
    pub ride: RideResult,
    pub is_exact_match: bool,
    pub is_nearby_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_distance: Option<f64>,
}

impl MatchResult {
    pub fn from_match(m: &RideMatch) -> Self {
        let mut ride = RideResult::from_ride(&m.ride);
        ride.available_seats = m.available_seats;

        let (from_distance, to_distance) = match m.kind {
            MatchKind::Exact => (None, None),
            MatchKind::Nearby { from_km, to_km } => (Some(from_km), Some(to_km)),
        };

        Self {
            ride,
            is_exact_match: m.is_exact(),
            is_nearby_match: !m.is_exact(),
            from_distance,
            to_distance,
        }
    }
}

/// Response to a ride search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub exact_matches: Vec<MatchResult>,
    pub nearby_matches: Vec<MatchResult>,
}

impl SearchResponse {
    pub fn from_results(results: &SearchResults) -> Self {
        Self {
            exact_matches: results.exact_matches.iter().map(MatchResult::from_match).collect(),
            nearby_matches: results.nearby_matches.iter().map(MatchResult::from_match).collect(),
        }
    }
}

/// A ride the caller has booked, with their latest request on it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyBookingResult {
    #[serde(flatten)]
    pub ride: RideResult,
    pub booking_id: Option<BookingId>,
    pub booking_status: Option<BookingStatus>,
    pub booked_seats: Option<u32>,
}

impl MyBookingResult {
    pub fn from_ride(ride: &Ride, rider: UserId) -> Self {
        let booking = ride.latest_booking_for(rider);
        Self {
            ride: RideResult::from_ride(ride),
            booking_id: booking.map(|b| b.id),
            booking_status: booking.map(|b| b.status()),
            booked_seats: booking.map(|b| b.booked_seats),
        }
    }
}

/// A notification as shown to its recipient.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResult {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub ride_id: Option<RideId>,
    pub actor_id: Option<UserId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationResult {
    pub fn from_notification(n: &Notification) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            message: n.message.clone(),
            ride_id: n.ride_id,
            actor_id: n.actor_id,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}
