//! Fixed distance table for running without geo services.
//!
//! Loads a JSON list of `{"from": .., "to": .., "km": ..}` entries and
//! answers lookups from it, in either direction, ignoring case. A place is
//! always 0 km from itself.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use super::DistanceResolver;
use super::error::GeoError;

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    from: String,
    to: String,
    km: f64,
}

/// Distance resolver that serves data from a table.
#[derive(Debug, Clone, Default)]
pub struct FixtureResolver {
    places: HashSet<String>,
    distances: HashMap<(String, String), f64>,
}

impl FixtureResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GeoError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| GeoError::Fixture(format!("Failed to read {path:?}: {e}")))?;
        Self::from_json(&json)
            .map_err(|e| GeoError::Fixture(format!("Failed to parse {path:?}: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self, GeoError> {
        let entries: Vec<FixtureEntry> =
            serde_json::from_str(json).map_err(|e| GeoError::Fixture(e.to_string()))?;

        Ok(entries
            .into_iter()
            .fold(Self::new(), |table, e| table.with_distance(&e.from, &e.to, e.km)))
    }

    /// Record the distance between two places.
    pub fn with_distance(mut self, a: &str, b: &str, km: f64) -> Self {
        let (a, b) = (normalize(a), normalize(b));
        self.places.insert(a.clone());
        self.places.insert(b.clone());
        self.distances.insert((a, b), km);
        self
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    fn lookup(&self, origin: &str, destination: &str) -> Result<f64, GeoError> {
        let (a, b) = (normalize(origin), normalize(destination));

        for place in [(&a, origin), (&b, destination)] {
            if !self.places.contains(place.0) {
                return Err(GeoError::Unresolved {
                    place: place.1.to_string(),
                });
            }
        }

        if a == b {
            return Ok(0.0);
        }

        self.distances
            .get(&(a.clone(), b.clone()))
            .or_else(|| self.distances.get(&(b, a)))
            .copied()
            .ok_or_else(|| GeoError::NoRoute {
                from: origin.to_string(),
                to: destination.to_string(),
            })
    }
}

impl DistanceResolver for FixtureResolver {
    async fn driving_distance_km(&self, origin: &str, destination: &str) -> Result<f64, GeoError> {
        self.lookup(origin, destination)
    }
}

fn normalize(place: &str) -> String {
    place.trim().to_lowercase()
}
