//! The caller's identity, as forwarded by the upstream identity provider.

use axum::http::HeaderMap;

use crate::domain::{Actor, Role, UserId};

use super::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Build the acting user from request headers.
///
/// The id is required; the name defaults to empty and the role to an
/// ordinary user.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, AppError> {
    let id = header_str(headers, USER_ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized {
            message: format!("missing {USER_ID_HEADER} header"),
        })?
        .parse::<UserId>()
        .map_err(|_| AppError::Unauthorized {
            message: format!("invalid {USER_ID_HEADER} header"),
        })?;

    let role = match header_str(headers, USER_ROLE_HEADER) {
        None => Role::default(),
        Some(role) => Role::parse(role).ok_or_else(|| AppError::Unauthorized {
            message: format!("unknown role {role:?}"),
        })?,
    };

    let name = header_str(headers, USER_NAME_HEADER).unwrap_or_default();

    Ok(Actor::new(id, name).with_role(role))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
