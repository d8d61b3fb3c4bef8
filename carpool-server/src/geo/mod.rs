//! Road distance between free-text places.
//!
//! Ride search only needs one thing from the outside world: how far apart
//! two places are by road. [`DistanceResolver`] is that seam. The live
//! implementation geocodes both places and asks a router for the driving
//! distance; the fixture implementation answers from a table.

use std::future::Future;

mod cache;
mod client;
mod error;
mod fixture;
mod types;

pub use cache::{CacheConfig, CachedResolver};
pub use client::{DEFAULT_GEOCODER_URL, DEFAULT_ROUTER_URL, GeoClient, GeoConfig};
pub use error::GeoError;
pub use fixture::FixtureResolver;
pub use types::{Coordinates, GeocodeHit, Route, RouteResponse};

/// Source of driving distances.
pub trait DistanceResolver: Send + Sync {
    /// Driving distance in kilometres from `origin` to `destination`.
    fn driving_distance_km(
        &self,
        origin: &str,
        destination: &str,
    ) -> impl Future<Output = Result<f64, GeoError>> + Send;
}

/// The resolver the server runs with.
#[derive(Debug)]
pub enum GeoResolver {
    Live(CachedResolver<GeoClient>),
    Fixture(FixtureResolver),
}

impl GeoResolver {
    /// Live lookups through a cache.
    pub fn live(config: GeoConfig, cache: &CacheConfig) -> Result<Self, GeoError> {
        Ok(GeoResolver::Live(CachedResolver::new(
            GeoClient::new(config)?,
            cache,
        )))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GeoResolver::Live(_) => "live",
            GeoResolver::Fixture(_) => "fixture",
        }
    }
}

impl DistanceResolver for GeoResolver {
    async fn driving_distance_km(&self, origin: &str, destination: &str) -> Result<f64, GeoError> {
        match self {
            GeoResolver::Live(resolver) => resolver.driving_distance_km(origin, destination).await,
            GeoResolver::Fixture(table) => table.driving_distance_km(origin, destination).await,
        }
    }
}
