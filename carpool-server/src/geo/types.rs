//! Wire types for the geocoding and routing services.

use serde::Deserialize;

use super::error::GeoError;

/// One result from a Nominatim-style `/search?format=json` query.
///
/// Coordinates arrive as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A resolved point on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Parse a geocoder hit's string coordinates.
    pub fn from_hit(hit: &GeocodeHit) -> Result<Self, GeoError> {
        let parse = |field: &str, value: &str| {
            value.trim().parse::<f64>().map_err(|e| GeoError::Json {
                message: format!("invalid {field} {value:?}: {e}"),
                body: None,
            })
        };

        Ok(Self {
            lat: parse("lat", &hit.lat)?,
            lon: parse("lon", &hit.lon)?,
        })
    }
}

/// Response from an OSRM-style `/route/v1/driving/...` request.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// One candidate route.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    /// Metres.
    pub distance: f64,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_geocoder_response() {
        let json = r#"[{"place_id":1,"lat":"12.9716","lon":"77.5946","display_name":"Bengaluru"}]"#;
        let hits: Vec<GeocodeHit> = serde_json::from_str(json).unwrap();
        let coords = Coordinates::from_hit(&hits[0]).unwrap();
        assert_eq!(coords.lat, 12.9716);
        assert_eq!(coords.lon, 77.5946);
    }

    #[test]
    fn bad_coordinates_are_json_errors() {
        let hit = GeocodeHit {
            lat: "north".into(),
            lon: "1.0".into(),
            display_name: None,
        };
        assert!(matches!(
            Coordinates::from_hit(&hit),
            Err(GeoError::Json { .. })
        ));
    }

    #[test]
    fn parse_route_response() {
        let json = r#"{"code":"Ok","routes":[{"distance":50123.4,"duration":2400.0,"legs":[]}],"waypoints":[]}"#;
        let response: RouteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.code.as_deref(), Some("Ok"));
        assert_eq!(response.routes[0].distance, 50123.4);
    }
}
