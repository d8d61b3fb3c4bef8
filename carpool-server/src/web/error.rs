//! Mapping failures onto HTTP responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, error};

use crate::domain::{BookingError, ErrorKind};
use crate::store::NotificationError;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// No usable identity on the request
    Unauthorized { message: String },
    /// Malformed request body, path or query
    BadRequest { message: String },
    /// Refused ride operation
    Booking(BookingError),
    /// Refused inbox operation
    Notification(NotificationError),
}

/// Error body: `{"error": {"kind": .., "message": ..}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

impl AppError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            AppError::BadRequest { .. } => (StatusCode::BAD_REQUEST, ErrorKind::Validation.as_str()),
            AppError::Booking(e) => {
                let kind = e.kind();
                (booking_status(kind), kind.as_str())
            }
            AppError::Notification(NotificationError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, ErrorKind::NotFound.as_str())
            }
            AppError::Notification(NotificationError::Unavailable(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Unauthorized { message } | AppError::BadRequest { message } => {
                message.clone()
            }
            AppError::Booking(e) => e.to_string(),
            AppError::Notification(e) => e.to_string(),
        }
    }
}

fn booking_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::SelfBooking => StatusCode::BAD_REQUEST,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Capacity
        | ErrorKind::DuplicateRequest
        | ErrorKind::DuplicateReview
        | ErrorKind::InvalidState
        | ErrorKind::Conflict => StatusCode::CONFLICT,
    }
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        AppError::Booking(e)
    }
}

impl From<NotificationError> for AppError {
    fn from(e: NotificationError) -> Self {
        AppError::Notification(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let message = self.message();

        if status.is_server_error() {
            error!(status = %status, kind, message = %message, "Request failed");
        } else {
            debug!(status = %status, kind, message = %message, "Request refused");
        }

        let body = Json(ErrorResponse {
            error: ErrorBody { kind, message },
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NotificationId, RideId};

    #[test]
    fn booking_errors_map_to_statuses() {
        let cases = [
            (BookingError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (BookingError::SelfBooking, StatusCode::BAD_REQUEST),
            (BookingError::Authorization("x"), StatusCode::FORBIDDEN),
            (BookingError::RideNotFound(RideId::new()), StatusCode::NOT_FOUND),
            (
                BookingError::Capacity {
                    requested: 2,
                    available: 1,
                },
                StatusCode::CONFLICT,
            ),
            (BookingError::DuplicateRequest, StatusCode::CONFLICT),
            (BookingError::DuplicateReview, StatusCode::CONFLICT),
            (BookingError::InvalidState("x".into()), StatusCode::CONFLICT),
            (BookingError::Conflict("x".into()), StatusCode::CONFLICT),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_and_kind().0, status);
        }
    }

    #[test]
    fn kinds_are_stable() {
        let err = AppError::from(BookingError::DuplicateReview);
        assert_eq!(err.status_and_kind().1, "duplicate_review");

        let err = AppError::from(NotificationError::NotFound(NotificationId::new()));
        assert_eq!(err.status_and_kind(), (StatusCode::NOT_FOUND, "not_found"));

        let err = AppError::Unauthorized {
            message: "who?".into(),
        };
        assert_eq!(err.status_and_kind(), (StatusCode::UNAUTHORIZED, "unauthenticated"));

        let err = AppError::from(NotificationError::Unavailable("inbox offline".into()));
        assert_eq!(
            err.status_and_kind(),
            (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        );
        assert_eq!(err.message(), "notification delivery failed: inbox offline");
    }

    #[test]
    fn response_has_error_status() {
        let response = AppError::from(BookingError::SelfBooking).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
