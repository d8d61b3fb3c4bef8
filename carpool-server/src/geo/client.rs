//! HTTP client for geocoding and road routing.
//!
//! Place names are geocoded with a Nominatim-compatible `/search` endpoint
//! and the driving distance between two points comes from an
//! OSRM-compatible `/route/v1/driving` endpoint.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tokio::sync::Semaphore;

use super::DistanceResolver;
use super::error::GeoError;
use super::types::{Coordinates, GeocodeHit, RouteResponse};

/// Default geocoder base URL.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Default router base URL.
pub const DEFAULT_ROUTER_URL: &str = "https://router.project-osrm.org";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Geocoded places kept in memory.
const PLACE_CACHE_CAPACITY: u64 = 10_000;

/// Configuration for the geo client.
#[derive(Debug, Clone)]
pub struct GeoConfig {
    /// Base URL of the geocoder
    pub geocoder_url: String,
    /// Base URL of the router
    pub router_url: String,
    /// Sent as `User-Agent`; public geocoders reject anonymous clients
    pub user_agent: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeoConfig {
    pub fn new() -> Self {
        Self {
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            router_url: DEFAULT_ROUTER_URL.to_string(),
            user_agent: concat!("carpool-server/", env!("CARGO_PKG_VERSION")).to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }

    pub fn with_geocoder_url(mut self, url: impl Into<String>) -> Self {
        self.geocoder_url = url.into();
        self
    }

    pub fn with_router_url(mut self, url: impl Into<String>) -> Self {
        self.router_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Geocoding and routing client.
///
/// A semaphore bounds in-flight requests across both services.
#[derive(Debug, Clone)]
pub struct GeoClient {
    http: reqwest::Client,
    geocoder_url: String,
    router_url: String,
    semaphore: Arc<Semaphore>,
    places: MokaCache<String, Coordinates>,
}

impl GeoClient {
    pub fn new(config: GeoConfig) -> Result<Self, GeoError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| GeoError::Config(format!("invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            geocoder_url: config.geocoder_url.trim_end_matches('/').to_string(),
            router_url: config.router_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
            places: MokaCache::builder()
                .max_capacity(PLACE_CACHE_CAPACITY)
                .build(),
        })
    }

    /// Resolve a free-text place name to coordinates (first hit wins).
    pub async fn geocode(&self, place: &str) -> Result<Coordinates, GeoError> {
        let key = place.trim().to_lowercase();
        if let Some(coords) = self.places.get(&key).await {
            return Ok(coords);
        }

        let url = format!("{}/search", self.geocoder_url);
        let body = self
            .fetch(
                self.http
                    .get(&url)
                    .query(&[("format", "json"), ("limit", "1"), ("q", place.trim())]),
            )
            .await?;

        let hits: Vec<GeocodeHit> = parse_json(&body)?;
        let hit = hits.first().ok_or_else(|| GeoError::Unresolved {
            place: place.to_string(),
        })?;
        let coords = Coordinates::from_hit(hit)?;

        self.places.insert(key, coords).await;
        Ok(coords)
    }

    /// Driving distance between two points, in kilometres.
    pub async fn route_km(&self, from: Coordinates, to: Coordinates) -> Result<f64, GeoError> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.router_url, from.lon, from.lat, to.lon, to.lat
        );
        let body = self
            .fetch(self.http.get(&url).query(&[("overview", "false")]))
            .await?;

        let response: RouteResponse = parse_json(&body)?;
        let route = response.routes.first().ok_or_else(|| GeoError::NoRoute {
            from: format!("{},{}", from.lat, from.lon),
            to: format!("{},{}", to.lat, to.lon),
        })?;

        Ok(route.distance / 1000.0)
    }

    async fn fetch(&self, request: reqwest::RequestBuilder) -> Result<String, GeoError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| GeoError::Closed)?;

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeoError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

impl DistanceResolver for GeoClient {
    async fn driving_distance_km(&self, origin: &str, destination: &str) -> Result<f64, GeoError> {
        let (from, to) = futures::try_join!(self.geocode(origin), self.geocode(destination))?;
        self.route_km(from, to).await
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, GeoError> {
    serde_json::from_str(body).map_err(|e| GeoError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = GeoConfig::new()
            .with_geocoder_url("http://localhost:8080/")
            .with_router_url("http://localhost:5000")
            .with_user_agent("tests")
            .with_max_concurrent(2)
            .with_timeout(3);

        assert_eq!(config.geocoder_url, "http://localhost:8080/");
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.timeout_secs, 3);

        let client = GeoClient::new(config).unwrap();
        assert_eq!(client.geocoder_url, "http://localhost:8080");
    }

    #[test]
    fn default_config() {
        let config = GeoConfig::default();
        assert_eq!(config.geocoder_url, DEFAULT_GEOCODER_URL);
        assert_eq!(config.router_url, DEFAULT_ROUTER_URL);
        assert!(config.user_agent.starts_with("carpool-server/"));
    }

    #[test]
    fn invalid_user_agent_rejected() {
        let config = GeoConfig::new().with_user_agent("bad\nagent");
        assert!(matches!(GeoClient::new(config), Err(GeoError::Config(_))));
    }

    #[tokio::test]
    async fn closed_client_refuses_lookups() {
        let client = GeoClient::new(GeoConfig::new()).unwrap();
        client.semaphore.close();

        assert!(matches!(
            client.geocode("Springfield").await,
            Err(GeoError::Closed)
        ));
    }

    #[test]
    fn parse_json_keeps_body_excerpt() {
        let err = parse_json::<RouteResponse>("not json").unwrap_err();
        assert!(matches!(err, GeoError::Json { body: Some(ref b), .. } if b == "not json"));
    }
}
