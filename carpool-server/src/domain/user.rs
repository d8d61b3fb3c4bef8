//! The acting user, as vouched for by the identity provider.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Role attached to a verified identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// An ordinary account; may post rides and book others' rides.
    #[default]
    RiderOrDriver,
    /// An administrator.
    Admin,
}

impl Role {
    /// Parse the wire form (`rider_or_driver` or `admin`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "rider_or_driver" => Some(Role::RiderOrDriver),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::RiderOrDriver => "rider_or_driver",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user performing an operation.
///
/// The core never checks credentials; whatever identity arrives here has
/// already been verified upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

impl Actor {
    /// An ordinary user with the given display name.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            role: Role::RiderOrDriver,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Name to show in messages, falling back when the provider sent none.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() { "Someone" } else { name }
    }
}
