//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::domain::{NotificationId, RideId};

use super::dto::*;
use super::error::AppError;
use super::identity::actor_from_headers;
use super::state::AppState;

type JsonBody<T> = Result<Json<T>, JsonRejection>;
type PathParam<T> = Result<Path<T>, PathRejection>;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/rides", get(list_rides).post(create_ride))
        .route("/rides/search", get(search_rides))
        .route("/rides/mine", get(my_rides))
        .route("/rides/bookings", get(my_bookings))
        .route("/rides/:id", get(get_ride).delete(delete_ride))
        .route("/rides/:id/book", post(book_ride))
        .route("/rides/:id/accept", post(accept_booking))
        .route("/rides/:id/reject", post(reject_booking))
        .route("/rides/:id/cancel", post(cancel_booking))
        .route("/rides/:id/complete", post(complete_ride))
        .route("/rides/:id/review", post(review_ride))
        .route("/notifications", get(list_notifications))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/read-all", put(mark_all_read))
        .route("/notifications/:id/read", put(mark_read))
        .route("/notifications/:id", delete(delete_notification))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Post a ride as the calling driver.
async fn create_ride(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: JsonBody<CreateRideRequest>,
) -> Result<(StatusCode, Json<RideResult>), AppError> {
    let actor = actor_from_headers(&headers)?;
    let Json(req) = body?;

    let ride = state
        .carpool
        .create_ride(&actor, req.into_new_ride()?)
        .await?;

    Ok((StatusCode::CREATED, Json(RideResult::from_ride(&ride))))
}

/// Every ride (admins only).
async fn list_rides(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<RideResult>>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let rides = state.carpool.all_rides(&actor).await?;
    Ok(Json(rides.iter().map(RideResult::from_ride).collect()))
}

async fn search_rides(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    actor_from_headers(&headers)?;
    let Query(params) = params?;

    let results = state.carpool.search(&params.into_query()?).await;
    Ok(Json(SearchResponse::from_results(&results)))
}

/// Rides the caller drives, newest first.
async fn my_rides(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<RideResult>>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let rides = state.carpool.rides_driven_by(actor.id).await;
    Ok(Json(rides.iter().map(RideResult::from_ride).collect()))
}

/// Rides the caller has asked to join, with their booking on each.
async fn my_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<MyBookingResult>>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let rides = state.carpool.bookings_of(actor.id).await;
    Ok(Json(
        rides
            .iter()
            .map(|ride| MyBookingResult::from_ride(ride, actor.id))
            .collect(),
    ))
}

async fn get_ride(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: PathParam<RideId>,
) -> Result<Json<RideResult>, AppError> {
    actor_from_headers(&headers)?;
    let Path(ride_id) = path?;

    let ride = state.carpool.ride(ride_id).await?;
    Ok(Json(RideResult::from_ride(&ride)))
}

async fn delete_ride(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: PathParam<RideId>,
) -> Result<StatusCode, AppError> {
    let actor = actor_from_headers(&headers)?;
    let Path(ride_id) = path?;

    state.carpool.delete_ride(ride_id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn book_ride(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: PathParam<RideId>,
    body: JsonBody<BookRequest>,
) -> Result<Json<RideResult>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let Path(ride_id) = path?;
    let Json(req) = body?;

    let ride = state
        .carpool
        .request_booking(ride_id, &actor, req.seats)
        .await?;
    Ok(Json(RideResult::from_ride(&ride)))
}

async fn accept_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: PathParam<RideId>,
    body: JsonBody<BookingActionRequest>,
) -> Result<Json<RideResult>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let Path(ride_id) = path?;
    let Json(req) = body?;

    let ride = state
        .carpool
        .accept_booking(ride_id, &actor, req.request_id)
        .await?;
    Ok(Json(RideResult::from_ride(&ride)))
}

async fn reject_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: PathParam<RideId>,
    body: JsonBody<BookingActionRequest>,
) -> Result<Json<RideResult>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let Path(ride_id) = path?;
    let Json(req) = body?;

    let ride = state
        .carpool
        .reject_booking(ride_id, &actor, req.request_id)
        .await?;
    Ok(Json(RideResult::from_ride(&ride)))
}

async fn cancel_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: PathParam<RideId>,
    body: JsonBody<BookingActionRequest>,
) -> Result<Json<RideResult>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let Path(ride_id) = path?;
    let Json(req) = body?;

    let ride = state
        .carpool
        .cancel_booking(ride_id, &actor, req.request_id)
        .await?;
    Ok(Json(RideResult::from_ride(&ride)))
}

async fn complete_ride(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: PathParam<RideId>,
) -> Result<Json<RideResult>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let Path(ride_id) = path?;

    let ride = state.carpool.complete_ride(ride_id, &actor).await?;
    Ok(Json(RideResult::from_ride(&ride)))
}

async fn review_ride(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: PathParam<RideId>,
    body: JsonBody<ReviewRequest>,
) -> Result<Json<RideResult>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let Path(ride_id) = path?;
    let Json(req) = body?;

    let ride = state
        .carpool
        .submit_review(ride_id, &actor, req.rating, req.comment)
        .await?;
    Ok(Json(RideResult::from_ride(&ride)))
}

/// The caller's latest notifications, newest first.
async fn list_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<NotificationResult>>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let notifications = state.carpool.inbox().list_for(actor.id).await;
    Ok(Json(
        notifications
            .iter()
            .map(NotificationResult::from_notification)
            .collect(),
    ))
}

async fn unread_count(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let count = state.carpool.inbox().unread_count(actor.id).await;
    Ok(Json(UnreadCountResponse { count }))
}

async fn mark_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: PathParam<NotificationId>,
) -> Result<Json<NotificationResult>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let Path(id) = path?;

    let notification = state.carpool.inbox().mark_read(actor.id, id).await?;
    Ok(Json(NotificationResult::from_notification(&notification)))
}

async fn mark_all_read(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let actor = actor_from_headers(&headers)?;
    let updated = state.carpool.inbox().mark_all_read(actor.id).await;
    Ok(Json(MarkAllReadResponse { updated }))
}

async fn delete_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: PathParam<NotificationId>,
) -> Result<StatusCode, AppError> {
    let actor = actor_from_headers(&headers)?;
    let Path(id) = path?;

    state.carpool.inbox().delete(actor.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
