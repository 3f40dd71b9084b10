use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role carried by a session.
///
/// Roles the backend may add later decode as `Unknown` instead of
/// invalidating the whole session; `Unknown` never grants admin access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Parses a role string as reported by the backend (case-insensitive).
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "user" => Role::User,
            _ => Role::Unknown,
        }
    }
}

/// Represents a user session.
///
/// The session lives exclusively inside the encrypted `session` cookie; the
/// server keeps no copy. It is created once at login and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Identifier of the user this session belongs to.
    pub subject_id: String,
    /// The user's role.
    pub role: Role,
    /// Opaque bearer token for the backend. Forwarded verbatim on every
    /// proxied request, never interpreted here.
    pub token: String,
    /// The timestamp when the session was created.
    pub issued_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether this session carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
