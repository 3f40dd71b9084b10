use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{
    middleware_layer::auth::session_from_cookies,
    models::session::Session,
    state::AppState,
};

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";
/// Default landing page for authenticated users.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Page prefixes that require a session.
const PROTECTED_PREFIXES: &[&str] = &["/dashboard"];
/// Dashboard subsections reserved for admins.
const ADMIN_PREFIXES: &[&str] = &["/dashboard/users", "/dashboard/departments"];
/// Auth pages that a logged-in user should not see again.
const PUBLIC_AUTH_PATHS: &[&str] = &["/login", "/signup"];

/// The guard's verdict for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through unmodified.
    Allow,
    /// Redirect to the login page.
    ToLogin,
    /// Redirect to the dashboard landing page.
    ToDashboard,
}

/// Whether `path` equals a prefix or sits underneath it.
fn path_under(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| {
        path == *prefix
            || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
    })
}

/// Decides allow/redirect for a page request. First match wins:
///
/// 1. protected path without a session → login page
/// 2. admin subsection without the admin role → dashboard landing
/// 3. auth page while already logged in → dashboard landing
/// 4. anything else → allow
pub fn evaluate(path: &str, session: Option<&Session>) -> GuardDecision {
    if path_under(path, PROTECTED_PREFIXES) {
        let Some(session) = session else {
            return GuardDecision::ToLogin;
        };
        if path_under(path, ADMIN_PREFIXES) && !session.is_admin() {
            return GuardDecision::ToDashboard;
        }
        return GuardDecision::Allow;
    }

    if PUBLIC_AUTH_PATHS.contains(&path) && session.is_some() {
        return GuardDecision::ToDashboard;
    }

    GuardDecision::Allow
}

/// A middleware gating the static dashboard pages.
///
/// Runs in front of the page file service; never renders content itself.
/// Decode failures count as "no session", so this cannot fail open.
pub async fn page_guard(
    State(state): State<AppState>,
    cookies: Cookies,
    request: Request<Body>,
    next: Next,
) -> Response {
    let session = session_from_cookies(&cookies, &state.config.master_key);

    match evaluate(request.uri().path(), session.as_ref()) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::ToLogin => {
            tracing::debug!("🔐 Page guard: redirecting {} to login", request.uri().path());
            Redirect::to(LOGIN_PATH).into_response()
        }
        GuardDecision::ToDashboard => {
            tracing::debug!(
                "🔐 Page guard: redirecting {} to dashboard",
                request.uri().path()
            );
            Redirect::to(DASHBOARD_PATH).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::Role;
    use chrono::{Duration, Utc};

    fn session(role: Role) -> Session {
        Session {
            subject_id: "7".to_string(),
            role,
            token: "t".to_string(),
            issued_at: Utc::now(),
            expires_at: Utc::now() + Duration::days(7),
        }
    }

    #[test]
    fn protected_paths_without_session_go_to_login() {
        assert_eq!(evaluate("/dashboard", None), GuardDecision::ToLogin);
        assert_eq!(evaluate("/dashboard/documents", None), GuardDecision::ToLogin);
        assert_eq!(evaluate("/dashboard/users", None), GuardDecision::ToLogin);
    }

    #[test]
    fn admin_paths_reject_non_admins_to_dashboard() {
        let user = session(Role::User);
        // Authenticated but unauthorized: dashboard landing, not login.
        assert_eq!(
            evaluate("/dashboard/users", Some(&user)),
            GuardDecision::ToDashboard
        );
        assert_eq!(
            evaluate("/dashboard/departments/3", Some(&user)),
            GuardDecision::ToDashboard
        );

        let unknown = session(Role::Unknown);
        assert_eq!(
            evaluate("/dashboard/users", Some(&unknown)),
            GuardDecision::ToDashboard
        );
    }

    #[test]
    fn admin_paths_allow_admins() {
        let admin = session(Role::Admin);
        assert_eq!(evaluate("/dashboard/users", Some(&admin)), GuardDecision::Allow);
        assert_eq!(
            evaluate("/dashboard/departments", Some(&admin)),
            GuardDecision::Allow
        );
    }

    #[test]
    fn regular_dashboard_pages_allow_any_session() {
        let user = session(Role::User);
        assert_eq!(evaluate("/dashboard", Some(&user)), GuardDecision::Allow);
        assert_eq!(
            evaluate("/dashboard/documents", Some(&user)),
            GuardDecision::Allow
        );
    }

    #[test]
    fn auth_pages_bounce_logged_in_users() {
        let user = session(Role::User);
        assert_eq!(evaluate("/login", Some(&user)), GuardDecision::ToDashboard);
        assert_eq!(evaluate("/signup", Some(&user)), GuardDecision::ToDashboard);
        assert_eq!(evaluate("/login", None), GuardDecision::Allow);
    }

    #[test]
    fn unrelated_paths_pass_through() {
        assert_eq!(evaluate("/", None), GuardDecision::Allow);
        assert_eq!(evaluate("/assets/logo.svg", None), GuardDecision::Allow);
        // Prefix lookalikes are not protected.
        assert_eq!(evaluate("/dashboard-help", None), GuardDecision::Allow);
    }
}
