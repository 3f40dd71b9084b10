use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::{
    crypto,
    error::AppError,
    models::session::Session,
    state::AppState,
};

/// Name of the cookie holding the sealed session.
pub const SESSION_COOKIE: &str = "session";

/// Decodes the session cookie, treating every failure as "no session".
pub fn session_from_cookies(cookies: &Cookies, master_key: &[u8]) -> Option<Session> {
    cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| crypto::session::open(cookie.value(), master_key))
}

/// A middleware that requires a valid session to be present.
///
/// Rejections happen here, before any outbound backend call. On success the
/// decoded session rides the request extensions into the handler.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response`.
pub async fn require_session(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    tracing::debug!("🔐 Checking authentication...");

    let Some(session) = session_from_cookies(&cookies, &state.config.master_key) else {
        tracing::warn!("❌ No valid session cookie found");
        return AppError::Authentication("Authentication required".to_string()).into_response();
    };

    tracing::debug!("✅ User authenticated: {}", session.subject_id);

    request.extensions_mut().insert(session);

    next.run(request).await
}
