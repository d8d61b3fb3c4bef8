//! Caching layer for distance lookups.
//!
//! Search resolves the same (query place, ride place) pairs over and over,
//! so successful distances are kept for a while. Failures are never cached:
//! the next search retries them.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use super::DistanceResolver;
use super::error::GeoError;

/// Cache key: normalized (origin, destination).
type PairKey = (String, String);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Distance resolver with caching.
///
/// Wraps any [`DistanceResolver`] and remembers the distances it returns.
#[derive(Debug)]
pub struct CachedResolver<R> {
    inner: R,
    distances: MokaCache<PairKey, f64>,
}

impl<R: DistanceResolver> CachedResolver<R> {
    pub fn new(inner: R, config: &CacheConfig) -> Self {
        let distances = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, distances }
    }

}

impl<R: DistanceResolver> DistanceResolver for CachedResolver<R> {
    async fn driving_distance_km(&self, origin: &str, destination: &str) -> Result<f64, GeoError> {
        let key = (normalize(origin), normalize(destination));

        if let Some(km) = self.distances.get(&key).await {
            return Ok(km);
        }

        let km = self.inner.driving_distance_km(origin, destination).await?;
        self.distances.insert(key, km).await;
        Ok(km)
    }
}

fn normalize(place: &str) -> String {
    place.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Resolves every pair to 42 km, failing for "nowhere".
    #[derive(Default)]
    struct CountingResolver {
        calls: AtomicUsize,
    }

    impl DistanceResolver for CountingResolver {
        async fn driving_distance_km(&self, origin: &str, _: &str) -> Result<f64, GeoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if origin == "nowhere" {
                return Err(GeoError::Unresolved {
                    place: origin.to_string(),
                });
            }
            Ok(42.0)
        }
    }

    #[tokio::test]
    async fn hits_are_cached_case_insensitively() {
        let cached = CachedResolver::new(CountingResolver::default(), &CacheConfig::default());

        assert_eq!(cached.driving_distance_km("Springfield", "Shelbyville").await.unwrap(), 42.0);
        assert_eq!(
            cached
                .driving_distance_km(" springfield ", "SHELBYVILLE")
                .await
                .unwrap(),
            42.0
        );
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cached = CachedResolver::new(CountingResolver::default(), &CacheConfig::default());

        assert!(cached.driving_distance_km("nowhere", "Shelbyville").await.is_err());
        assert!(cached.driving_distance_km("nowhere", "Shelbyville").await.is_err());
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn direction_is_part_of_the_key() {
        let cached = CachedResolver::new(CountingResolver::default(), &CacheConfig::default());

        cached.driving_distance_km("A", "B").await.unwrap();
        cached.driving_distance_km("B", "A").await.unwrap();
        cached.driving_distance_km("a", "b").await.unwrap();
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }
}
