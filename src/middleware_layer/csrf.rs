use axum::{
    body::Body,
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tower_cookies::Cookies;

use crate::error::AppError;

/// Name of the readable cookie holding the CSRF token.
pub const CSRF_COOKIE: &str = "csrf_token";

/// A middleware that verifies the double-submit CSRF token.
///
/// The token issued at login lives in a readable cookie; mutating requests
/// must echo it in the `x-csrf-token` header. Comparison is constant-time.
///
/// # Arguments
///
/// * `cookies` - The request cookies.
/// * `req` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response`.
pub async fn verify_csrf(cookies: Cookies, req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::GET
        || req.method() == Method::HEAD
        || req.method() == Method::OPTIONS
    {
        tracing::debug!("✅ CSRF exemption: {} request", req.method());
        return next.run(req).await;
    }

    let csrf_token_cookie = match cookies.get(CSRF_COOKIE) {
        Some(c) => c.value().to_string(),
        None => {
            tracing::warn!("❌ CSRF: cookie {} not found", CSRF_COOKIE);
            return AppError::Authentication("Missing CSRF token cookie".to_string())
                .into_response();
        }
    };

    let headers = req.headers();
    let csrf_token_header = match headers
        .get("x-csrf-token")
        .or_else(|| headers.get("X-CSRF-Token"))
    {
        Some(token) => match token.to_str() {
            Ok(t) => t.to_string(),
            Err(_) => {
                tracing::warn!("❌ CSRF: header has invalid format");
                return AppError::Authentication("Invalid CSRF token format".to_string())
                    .into_response();
            }
        },
        None => {
            tracing::warn!("❌ CSRF: header x-csrf-token not found");
            return AppError::Authentication("Missing CSRF token header".to_string())
                .into_response();
        }
    };

    let matches: bool = csrf_token_cookie
        .as_bytes()
        .ct_eq(csrf_token_header.as_bytes())
        .into();

    if !matches {
        tracing::warn!("❌ CSRF: tokens do not match");
        return AppError::Authentication("CSRF token mismatch".to_string()).into_response();
    }

    tracing::debug!("✅ CSRF token valid");
    next.run(req).await
}
