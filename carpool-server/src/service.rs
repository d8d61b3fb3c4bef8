//! The carpool operations the HTTP layer exposes.
//!
//! Each booking transition runs against the stored ride under that ride's
//! lock, is committed only if it succeeds, and has its notifications
//! delivered afterwards.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::booking::{RideEvent, machine, review};
use crate::domain::{Actor, BookingError, BookingId, NewRide, Ride, RideId, Role, UserId};
use crate::geo::DistanceResolver;
use crate::notify::Notifier;
use crate::search::{RideQuery, RideSearchEngine, SearchConfig, SearchResults};
use crate::store::{NotificationStore, RideStore};

/// Rides, bookings, reviews, search and inboxes.
pub struct CarpoolService<G> {
    rides: RideStore,
    notifier: Notifier<NotificationStore>,
    resolver: G,
    search_config: SearchConfig,
}

impl<G: DistanceResolver> CarpoolService<G> {
    pub fn new(resolver: G, search_config: SearchConfig) -> Self {
        Self {
            rides: RideStore::new(),
            notifier: Notifier::new(NotificationStore::new()),
            resolver,
            search_config,
        }
    }

    /// The notification inboxes.
    pub fn inbox(&self) -> &NotificationStore {
        self.notifier.sink()
    }

    /// Post a new ride driven by `driver`.
    pub async fn create_ride(&self, driver: &Actor, new: NewRide) -> Result<Ride, BookingError> {
        let ride = Ride::create(driver.id, new, Utc::now()).inspect_err(|e| {
            debug!(user_id = %driver.id, error = %e, "Rejected new ride");
        })?;
        self.rides.insert(ride.clone()).await?;

        info!(
            ride_id = %ride.id,
            user_id = %driver.id,
            from = %ride.from,
            to = %ride.to,
            seats = ride.capacity_seats,
            "Ride created"
        );
        Ok(ride)
    }

    pub async fn ride(&self, id: RideId) -> Result<Ride, BookingError> {
        self.rides.get(id).await
    }

    /// Every ride, newest first. Admins only.
    pub async fn all_rides(&self, actor: &Actor) -> Result<Vec<Ride>, BookingError> {
        if actor.role != Role::Admin {
            return Err(BookingError::Authorization("only admins can list every ride"));
        }
        let mut rides = self.rides.snapshot().await;
        rides.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rides)
    }

    /// Rides `driver` has posted, newest first.
    pub async fn rides_driven_by(&self, driver: UserId) -> Vec<Ride> {
        self.rides.by_driver(driver).await
    }

    /// Rides `rider` has asked to join, soonest departure first.
    pub async fn bookings_of(&self, rider: UserId) -> Vec<Ride> {
        self.rides.with_passenger(rider).await
    }

    /// Remove a ride. Only its driver or an admin may.
    pub async fn delete_ride(&self, ride_id: RideId, actor: &Actor) -> Result<Ride, BookingError> {
        let removed = self
            .rides
            .remove_if(ride_id, |ride| {
                if ride.driver_id == actor.id || actor.role == Role::Admin {
                    Ok(())
                } else {
                    Err(BookingError::Authorization(
                        "only the driver or an admin can delete a ride",
                    ))
                }
            })
            .await;

        match &removed {
            Ok(_) => info!(ride_id = %ride_id, user_id = %actor.id, "Ride deleted"),
            Err(e) => debug!(ride_id = %ride_id, user_id = %actor.id, error = %e, "Ride deletion refused"),
        }
        removed
    }

    pub async fn request_booking(
        &self,
        ride_id: RideId,
        rider: &Actor,
        seats: u32,
    ) -> Result<Ride, BookingError> {
        self.transition("request_booking", ride_id, rider, |ride| {
            machine::request_booking(ride, rider, seats, Utc::now())
        })
        .await
    }

    pub async fn accept_booking(
        &self,
        ride_id: RideId,
        driver: &Actor,
        booking_id: BookingId,
    ) -> Result<Ride, BookingError> {
        self.transition("accept_booking", ride_id, driver, |ride| {
            machine::accept_booking(ride, driver, booking_id)
        })
        .await
    }

    pub async fn reject_booking(
        &self,
        ride_id: RideId,
        driver: &Actor,
        booking_id: BookingId,
    ) -> Result<Ride, BookingError> {
        self.transition("reject_booking", ride_id, driver, |ride| {
            machine::reject_booking(ride, driver, booking_id)
        })
        .await
    }

    pub async fn cancel_booking(
        &self,
        ride_id: RideId,
        rider: &Actor,
        booking_id: BookingId,
    ) -> Result<Ride, BookingError> {
        self.transition("cancel_booking", ride_id, rider, |ride| {
            machine::cancel_booking(ride, rider, booking_id)
        })
        .await
    }

    pub async fn complete_ride(&self, ride_id: RideId, driver: &Actor) -> Result<Ride, BookingError> {
        self.transition("complete_ride", ride_id, driver, |ride| {
            machine::complete_ride(ride, driver)
        })
        .await
    }

    pub async fn submit_review(
        &self,
        ride_id: RideId,
        reviewer: &Actor,
        rating: i64,
        comment: Option<String>,
    ) -> Result<Ride, BookingError> {
        self.transition("submit_review", ride_id, reviewer, |ride| {
            review::submit_review(ride, reviewer, rating, comment, Utc::now())
        })
        .await
    }

    /// Search active rides departing today or later.
    pub async fn search(&self, query: &RideQuery) -> SearchResults {
        self.search_from(query, Utc::now().date_naive()).await
    }

    /// Search as if today were `today`.
    pub async fn search_from(&self, query: &RideQuery, today: NaiveDate) -> SearchResults {
        let rides = self.rides.snapshot().await;
        RideSearchEngine::new(&self.resolver, &self.search_config)
            .search(rides, query, today)
            .await
    }

    /// Apply one booking transition and deliver its notifications.
    async fn transition<F>(
        &self,
        op: &'static str,
        ride_id: RideId,
        actor: &Actor,
        f: F,
    ) -> Result<Ride, BookingError>
    where
        F: FnOnce(&mut Ride) -> Result<RideEvent, BookingError>,
    {
        match self.rides.update(ride_id, f).await {
            Ok((ride, event)) => {
                info!(
                    op,
                    ride_id = %ride_id,
                    user_id = %actor.id,
                    event = event.name(),
                    "Ride updated"
                );
                self.notifier.publish(std::slice::from_ref(&event)).await;
                Ok(ride)
            }
            Err(e) => {
                debug!(
                    op,
                    ride_id = %ride_id,
                    user_id = %actor.id,
                    kind = e.kind().as_str(),
                    error = %e,
                    "Ride operation refused"
                );
                Err(e)
            }
        }
    }
}
