use serde::{Deserialize, Serialize};

/// The user object inside the backend's login response.
///
/// Only `id` is required; everything else the backend sends is optional and
/// relayed to the dashboard as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// The backend's numeric user id.
    pub id: i64,
    /// The user's full name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The user's email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// The user's role as reported by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// The backend's login response.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    /// The bearer token for subsequent backend calls.
    #[serde(alias = "token")]
    pub access_token: String,
    /// The authenticated user's profile.
    pub user: UserProfile,
}
