//! Application state for the web layer.

use std::sync::Arc;

use crate::geo::GeoResolver;
use crate::service::CarpoolService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Rides, bookings, search and inboxes
    pub carpool: Arc<CarpoolService<GeoResolver>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(carpool: CarpoolService<GeoResolver>) -> Self {
        Self {
            carpool: Arc::new(carpool),
        }
    }
}
