//! In-memory ride storage with per-ride serialization.
//!
//! Each ride sits behind its own async mutex. Updates run against a clone
//! and the clone replaces the stored ride only if the update succeeds, so a
//! failed transition never leaves a half-applied ride behind and two
//! concurrent accepts on the same ride cannot both observe the same free
//! seats.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::domain::{BookingError, Ride, RideId, UserId};

/// All rides, keyed by id.
#[derive(Debug, Default)]
pub struct RideStore {
    rides: RwLock<HashMap<RideId, Arc<Mutex<Ride>>>>,
}

impl RideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly created ride.
    pub async fn insert(&self, ride: Ride) -> Result<(), BookingError> {
        let mut rides = self.rides.write().await;
        if rides.contains_key(&ride.id) {
            return Err(BookingError::Conflict(format!("ride {} already exists", ride.id)));
        }
        rides.insert(ride.id, Arc::new(Mutex::new(ride)));
        Ok(())
    }

    /// A copy of the ride as currently committed.
    pub async fn get(&self, id: RideId) -> Result<Ride, BookingError> {
        let slot = self.slot(id).await?;
        let ride = slot.lock().await;
        Ok(ride.clone())
    }

    /// Apply `f` to the ride atomically.
    ///
    /// Returns the committed ride together with whatever `f` produced. If
    /// `f` fails the stored ride is untouched.
    pub async fn update<T, F>(&self, id: RideId, f: F) -> Result<(Ride, T), BookingError>
    where
        F: FnOnce(&mut Ride) -> Result<T, BookingError>,
    {
        let slot = self.slot(id).await?;
        let mut committed = slot.lock().await;

        let mut draft = committed.clone();
        let output = f(&mut draft)?;
        *committed = draft;

        Ok((committed.clone(), output))
    }

    /// Remove the ride if `allowed` approves of it.
    pub async fn remove_if<F>(&self, id: RideId, allowed: F) -> Result<Ride, BookingError>
    where
        F: FnOnce(&Ride) -> Result<(), BookingError>,
    {
        let mut rides = self.rides.write().await;
        let slot = rides.get(&id).cloned().ok_or(BookingError::RideNotFound(id))?;
        let ride = slot.lock().await;
        allowed(&ride)?;
        rides.remove(&id);
        Ok(ride.clone())
    }

    /// Copies of every ride matching `keep`.
    pub async fn find<F>(&self, keep: F) -> Vec<Ride>
    where
        F: Fn(&Ride) -> bool,
    {
        let slots: Vec<Arc<Mutex<Ride>>> = self.rides.read().await.values().cloned().collect();

        let mut found = Vec::new();
        for slot in slots {
            let ride = slot.lock().await;
            if keep(&ride) {
                found.push(ride.clone());
            }
        }
        found
    }

    /// Every ride.
    pub async fn snapshot(&self) -> Vec<Ride> {
        self.find(|_| true).await
    }

    /// Rides posted by `driver`, newest first.
    pub async fn by_driver(&self, driver: UserId) -> Vec<Ride> {
        let mut rides = self.find(|ride| ride.driver_id == driver).await;
        rides.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rides
    }

    /// Rides `rider` has asked to join, soonest departure first.
    pub async fn with_passenger(&self, rider: UserId) -> Vec<Ride> {
        let mut rides = self
            .find(|ride| ride.latest_booking_for(rider).is_some())
            .await;
        rides.sort_by_key(|ride| (ride.departs_at(), ride.created_at));
        rides
    }

    async fn slot(&self, id: RideId) -> Result<Arc<Mutex<Ride>>, BookingError> {
        self.rides
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(BookingError::RideNotFound(id))
    }
}
