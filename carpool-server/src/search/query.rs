//! Search filters.

use chrono::NaiveDate;

use crate::domain::{Ride, RideStatus};

/// What a rider is looking for. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RideQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<NaiveDate>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_seats: Option<u32>,
}

impl RideQuery {
    /// Create a query for a route.
    pub fn route_between(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            ..Self::default()
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_min_seats(mut self, seats: u32) -> Self {
        self.min_seats = Some(seats);
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Both endpoints, trimmed, if both are given and non-blank.
    pub fn route(&self) -> Option<(&str, &str)> {
        let from = self.from.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let to = self.to.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((from, to))
    }

    /// Status, date and price filters.
    ///
    /// Without a date, only rides departing today or later qualify.
    pub fn matches_base(&self, ride: &Ride, today: NaiveDate) -> bool {
        if ride.status() != RideStatus::Active {
            return false;
        }

        let date_ok = match self.date {
            Some(date) => ride.departure_date == date,
            None => ride.departure_date >= today,
        };
        if !date_ok {
            return false;
        }

        self.min_price.is_none_or(|min| ride.price_per_seat >= min)
            && self.max_price.is_none_or(|max| ride.price_per_seat <= max)
    }

    /// Case-insensitive substring match of both endpoints.
    ///
    /// Always false when the query has no route.
    pub fn matches_route(&self, ride: &Ride) -> bool {
        let Some((from, to)) = self.route() else {
            return false;
        };
        contains_ignore_case(&ride.from, from) && contains_ignore_case(&ride.to, to)
    }

    pub fn has_seats(&self, available: u32) -> bool {
        self.min_seats.is_none_or(|min| available >= min)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
