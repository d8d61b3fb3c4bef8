//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::geo::{CacheConfig, GeoConfig};
use crate::search::SearchConfig;

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub geo: GeoConfig,
    pub cache: CacheConfig,
    pub search: SearchConfig,
    /// When set, distances come from this JSON table instead of live
    /// geo services.
    pub geo_fixture: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset or blank variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let geo_defaults = GeoConfig::default();
        let cache_defaults = CacheConfig::default();
        let search_defaults = SearchConfig::default();

        let mut geo = GeoConfig::new()
            .with_timeout(parse(&get, "GEO_TIMEOUT_SECS", geo_defaults.timeout_secs)?)
            .with_max_concurrent(parse(
                &get,
                "GEO_MAX_CONCURRENT",
                geo_defaults.max_concurrent,
            )?);
        if let Some(url) = get("GEOCODER_URL") {
            geo = geo.with_geocoder_url(url);
        }
        if let Some(url) = get("ROUTER_URL") {
            geo = geo.with_router_url(url);
        }
        if let Some(agent) = get("GEO_USER_AGENT") {
            geo = geo.with_user_agent(agent);
        }

        let cache = CacheConfig {
            ttl: Duration::from_secs(parse(
                &get,
                "GEO_CACHE_TTL_SECS",
                cache_defaults.ttl.as_secs(),
            )?),
            max_capacity: parse(&get, "GEO_CACHE_CAPACITY", cache_defaults.max_capacity)?,
        };

        let radius: f64 = parse(&get, "NEARBY_RADIUS_KM", search_defaults.nearby_radius_km)?;
        if !radius.is_finite() || radius < 0.0 {
            return Err(ConfigError::Invalid {
                var: "NEARBY_RADIUS_KM",
                value: radius.to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }
        let search = SearchConfig::new(
            radius,
            parse(
                &get,
                "SEARCH_MAX_CONCURRENT",
                search_defaults.max_concurrent_lookups,
            )?,
            parse(
                &get,
                "SEARCH_LOOKUP_TIMEOUT_MS",
                search_defaults.lookup_timeout_ms,
            )?,
        );

        Ok(Self {
            bind_addr: parse(&get, "CARPOOL_BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?,
            geo,
            cache,
            search,
            geo_fixture: get("GEO_FIXTURE_FILE").map(PathBuf::from),
        })
    }
}

fn parse<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            }),
        },
    }
}
