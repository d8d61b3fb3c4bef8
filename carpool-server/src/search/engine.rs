//! Two-phase ride search.
//!
//! Exact matches come straight from the query filters. When the query names
//! both endpoints, every remaining candidate is then measured against the
//! query by road distance and kept if it passes the nearby heuristic.

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::booking::ledger;
use crate::domain::Ride;
use crate::geo::DistanceResolver;

use super::config::SearchConfig;
use super::nearby::is_nearby;
use super::query::RideQuery;

/// How a ride matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    Exact,
    /// Road distances from the query's origin to the ride's origin and from
    /// the query's destination to the ride's destination.
    Nearby { from_km: f64, to_km: f64 },
}

/// A ride in search results.
#[derive(Debug, Clone, PartialEq)]
pub struct RideMatch {
    pub ride: Ride,
    /// Capacity minus accepted seats at search time.
    pub available_seats: u32,
    pub kind: MatchKind,
}

impl RideMatch {
    pub fn is_exact(&self) -> bool {
        self.kind == MatchKind::Exact
    }
}

/// Result of ride search. Each list is ordered by departure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub exact_matches: Vec<RideMatch>,
    pub nearby_matches: Vec<RideMatch>,
}

/// Ride search over a set of candidate rides.
pub struct RideSearchEngine<'a, R> {
    resolver: &'a R,
    config: &'a SearchConfig,
}

impl<'a, R: DistanceResolver> RideSearchEngine<'a, R> {
    pub fn new(resolver: &'a R, config: &'a SearchConfig) -> Self {
        Self { resolver, config }
    }

    /// Search `rides` for `query`, treating `today` as the earliest
    /// departure date when the query has none.
    ///
    /// Distance lookups that fail or time out drop their candidate from the
    /// nearby list; they never fail the search.
    pub async fn search(&self, rides: Vec<Ride>, query: &RideQuery, today: NaiveDate) -> SearchResults {
        let candidates: Vec<(Ride, u32)> = rides
            .into_iter()
            .filter(|ride| query.matches_base(ride, today))
            .map(|ride| {
                let seats = ledger::available_seats(&ride);
                (ride, seats)
            })
            .filter(|(_, seats)| query.has_seats(*seats))
            .collect();

        let Some((from, to)) = query.route() else {
            let mut exact_matches: Vec<RideMatch> =
                candidates.into_iter().map(exact_match).collect();
            sort_by_departure(&mut exact_matches);
            return SearchResults {
                exact_matches,
                nearby_matches: Vec::new(),
            };
        };

        let (exact, rest): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|(ride, _)| query.matches_route(ride));

        let mut exact_matches: Vec<RideMatch> = exact.into_iter().map(exact_match).collect();
        let mut nearby_matches = self.nearby_matches(from, to, rest).await;

        sort_by_departure(&mut exact_matches);
        sort_by_departure(&mut nearby_matches);

        debug!(
            exact = exact_matches.len(),
            nearby = nearby_matches.len(),
            "Search complete"
        );

        SearchResults {
            exact_matches,
            nearby_matches,
        }
    }

    async fn nearby_matches(&self, from: &str, to: &str, candidates: Vec<(Ride, u32)>) -> Vec<RideMatch> {
        let lookups: Vec<_> = candidates
            .into_iter()
            .map(|(ride, seats)| self.measure(from, to, ride, seats))
            .collect();

        let results: Vec<Option<RideMatch>> = stream::iter(lookups)
            .buffer_unordered(self.config.max_concurrent_lookups.max(1))
            .collect()
            .await;

        results.into_iter().flatten().collect()
    }

    /// Look up both distances for one candidate and apply the heuristic.
    async fn measure(&self, from: &str, to: &str, ride: Ride, seats: u32) -> Option<RideMatch> {
        let lookup = async {
            futures::try_join!(
                self.resolver.driving_distance_km(from, &ride.from),
                self.resolver.driving_distance_km(to, &ride.to),
            )
        };

        let (from_km, to_km) = match tokio::time::timeout(self.config.lookup_timeout(), lookup).await {
            Ok(Ok(distances)) => distances,
            Ok(Err(e)) => {
                debug!(ride_id = %ride.id, error = %e, "Distance lookup failed, skipping");
                return None;
            }
            Err(_) => {
                debug!(ride_id = %ride.id, "Distance lookup timed out, skipping");
                return None;
            }
        };

        is_nearby(from_km, to_km, self.config.nearby_radius_km).then(|| RideMatch {
            ride,
            available_seats: seats,
            kind: MatchKind::Nearby { from_km, to_km },
        })
    }
}

fn exact_match((ride, available_seats): (Ride, u32)) -> RideMatch {
    RideMatch {
        ride,
        available_seats,
        kind: MatchKind::Exact,
    }
}

fn sort_by_departure(matches: &mut [RideMatch]) {
    matches.sort_by_key(|m| (m.ride.departure_date, m.ride.departure_time, m.ride.created_at));
}
