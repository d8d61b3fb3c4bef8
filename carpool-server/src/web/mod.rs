//! Web layer for the carpool marketplace.
//!
//! JSON endpoints for rides, bookings, reviews, search and notifications.

mod dto;
mod error;
mod identity;
mod routes;
mod state;

pub use dto::*;
pub use error::{AppError, ErrorBody, ErrorResponse};
pub use identity::{USER_ID_HEADER, USER_NAME_HEADER, USER_ROLE_HEADER, actor_from_headers};
pub use routes::create_router;
pub use state::AppState;
