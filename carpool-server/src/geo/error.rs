//! Geo lookup error types.

use std::fmt;

/// Errors from geocoding or routing.
#[derive(Debug)]
pub enum GeoError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// Service returned an error status code
    Api { status: u16, message: String },

    /// The geocoder had no result for this place
    Unresolved { place: String },

    /// No drivable route between the two places
    NoRoute { from: String, to: String },

    /// Rate limited by the service
    RateLimited,

    /// Fixture data could not be loaded
    Fixture(String),

    /// Client settings were unusable
    Config(String),

    /// The client no longer accepts requests
    Closed,
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::Http(e) => write!(f, "HTTP error: {e}"),
            GeoError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            GeoError::Api { status, message } => write!(f, "API error {status}: {message}"),
            GeoError::Unresolved { place } => write!(f, "could not geocode {place:?}"),
            GeoError::NoRoute { from, to } => write!(f, "no route from {from:?} to {to:?}"),
            GeoError::RateLimited => write!(f, "rate limited by geo service"),
            GeoError::Fixture(msg) => write!(f, "fixture error: {msg}"),
            GeoError::Config(msg) => write!(f, "configuration error: {msg}"),
            GeoError::Closed => write!(f, "geo client is shut down"),
        }
    }
}

impl std::error::Error for GeoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GeoError {
    fn from(err: reqwest::Error) -> Self {
        GeoError::Http(err)
    }
}
