use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::time::Duration;

use crate::{
    crypto,
    error::{AppError, Result},
    middleware_layer::auth::SESSION_COOKIE,
    middleware_layer::csrf::CSRF_COOKIE,
    models::session::{Role, Session},
    models::user::{LoginResponse, UserProfile},
    services::backend::Relayed,
    state::AppState,
    validation::auth::*,
};

/// The request payload for user login.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The request payload for user signup.
#[derive(Deserialize, Debug)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, rename = "departmentIds")]
    pub department_ids: Vec<i64>,
}

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// The response payload for a successful login.
#[derive(Serialize)]
pub struct LoginResponseBody {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
}

/// Creates a secure cookie with the given name, value, and max age.
fn create_secure_cookie(name: String, value: String, max_age_days: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.clone(), value);

    let is_production = std::env::var("APP_ENV")
        .unwrap_or_else(|_| "development".to_string()) == "production";

    if name != CSRF_COOKIE {
        cookie.set_http_only(true);
    }

    if is_production {
        cookie.set_secure(true);
    }

    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    let duration_secs = max_age_days * 86400;
    cookie.set_max_age(Duration::seconds(duration_secs));
    cookie.set_path("/");

    cookie
}

/// Removes a cookie by name.
fn clear_cookie(cookies: &Cookies, name: &'static str) {
    let mut cookie = Cookie::new(name, "");
    cookie.set_max_age(Duration::seconds(0));
    cookie.set_path("/");
    cookies.remove(cookie);
}

/// Handles user login.
///
/// Forwards the credentials to the backend; on success wraps the returned
/// bearer token and profile into the sealed session cookie. The backend's
/// rejection status is relayed as-is.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt for: {}", payload.email);
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let relayed = state
        .backend
        .send_json(
            reqwest::Method::POST,
            "/auth/login",
            None,
            &sonic_rs::json!({
                "email": payload.email,
                "password": payload.password,
            }),
        )
        .await?;

    let login: LoginResponse = sonic_rs::from_str(&relayed.body)
        .map_err(|e| AppError::MalformedResponse(format!("login response: {}", e)))?;

    if login.access_token.is_empty() {
        return Err(AppError::MalformedResponse(
            "login response carried an empty access token".to_string(),
        ));
    }

    let role = login
        .user
        .role
        .as_deref()
        .map(Role::parse)
        .unwrap_or(Role::User);

    let session = Session {
        subject_id: login.user.id.to_string(),
        role,
        token: login.access_token.clone(),
        issued_at: Utc::now(),
        expires_at: Utc::now() + chrono::Duration::days(state.config.session_duration_days),
    };

    let sealed = crypto::session::seal(&session, &state.config.master_key)?;

    let session_cookie = create_secure_cookie(
        SESSION_COOKIE.to_string(),
        sealed,
        state.config.session_duration_days,
    );
    cookies.add(session_cookie);
    tracing::info!("✅ Session cookie added for user: {}", session.subject_id);

    let csrf_token = crypto::csrf::generate_csrf_token()?;
    let csrf_cookie = create_secure_cookie(
        CSRF_COOKIE.to_string(),
        csrf_token,
        state.config.session_duration_days,
    );
    cookies.add(csrf_cookie);
    tracing::info!("✅ CSRF cookie added");

    tracing::info!("✅ User logged in: {}", session.subject_id);

    let response = LoginResponseBody {
        success: true,
        message: "Login successful".to_string(),
        user: login.user,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles user signup.
///
/// Pure relay: no session is established until the user logs in.
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Relayed> {
    tracing::info!("📝 Signup attempt for: {}", payload.email);
    validate_name(&payload.name)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    state
        .backend
        .send_json(
            reqwest::Method::POST,
            "/auth/signup",
            None,
            &sonic_rs::json!({
                "name": payload.name,
                "email": payload.email,
                "password": payload.password,
                "departmentIds": payload.department_ids,
            }),
        )
        .await
}

/// Handles user logout.
///
/// The cookie is the only copy of the session, so clearing it is the whole
/// operation; there is nothing server-side to revoke.
#[axum::debug_handler]
pub async fn logout(
    Extension(session): Extension<Session>,
    cookies: Cookies,
) -> Result<Response> {
    tracing::info!("👋 Logout for user: {}", session.subject_id);

    clear_cookie(&cookies, SESSION_COOKIE);
    clear_cookie(&cookies, CSRF_COOKIE);

    tracing::info!("✅ User logged out: {}", session.subject_id);

    let response = AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Returns the identity of the current session without a backend call.
#[axum::debug_handler]
pub async fn me(Extension(session): Extension<Session>) -> Result<Response> {
    let body = sonic_rs::json!({
        "id": session.subject_id,
        "role": session.role,
    });

    Ok((
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        sonic_rs::to_string(&body)
            .map_err(|e| AppError::Internal(format!("Serialization failed: {}", e)))?,
    )
        .into_response())
}
