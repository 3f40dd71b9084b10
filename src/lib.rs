use axum::{
    Router,
    routing::{get, post, put, delete},
    middleware::{from_fn, from_fn_with_state},
    extract::DefaultBodyLimit,
};

use http::{Method, header};
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::{
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
    cors::CorsLayer,
};

use tracing::Level;

pub mod config;
pub mod error;
pub mod state;

pub mod crypto {
    pub mod aes;
    pub mod csrf;
    pub mod session;
}

pub mod models {
    pub mod session;
    pub mod user;
}

pub mod services {
    pub mod backend;
    pub mod genai;
}

pub mod handlers {
    pub mod auth;
    pub mod botany;
    pub mod categories;
    pub mod chatbot;
    pub mod departments;
    pub mod documents;
    pub mod users;
}

pub mod middleware_layer {
    pub mod auth;
    pub mod csrf;
    pub mod guard;
}

pub mod validation {
    pub mod auth;
}

pub use config::Config;
pub use state::AppState;

/// Directory the static dashboard assets are served from.
const PAGES_DIR: &str = "public";

/// Maximum accepted request body (covers document uploads).
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Builds the gateway router.
///
/// Three route groups share the state: the public auth endpoints (rate
/// limited), the session-gated proxy endpoints, and the static dashboard
/// pages behind the route guard.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
            "x-csrf-token".parse().unwrap(),
        ])
        .allow_credentials(true)
        .expose_headers(["x-csrf-token".parse().unwrap()])
        .max_age(Duration::from_secs(86400));

    let auth_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(5)
            .burst_size(20)
            .use_headers()
            .finish()
            .unwrap(),
    );

    let protected_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10_000)
            .burst_size(50_000)
            .use_headers()
            .finish()
            .unwrap(),
    );

    let auth_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/signup", post(handlers::auth::signup))
        .layer(tower_governor::GovernorLayer::new(auth_governor_conf))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/api/users", get(handlers::users::list_users))
        .route("/api/users/{user_id}", delete(handlers::users::delete_user))
        .route(
            "/api/users/{user_id}/assign-departments",
            put(handlers::users::assign_departments),
        )
        .route(
            "/api/departments",
            get(handlers::departments::list_departments)
                .post(handlers::departments::create_department),
        )
        .route(
            "/api/departments/{department_id}",
            delete(handlers::departments::delete_department),
        )
        .route(
            "/api/categories",
            get(handlers::categories::list_categories)
                .post(handlers::categories::create_category),
        )
        .route(
            "/api/categories/{category_id}",
            delete(handlers::categories::delete_category),
        )
        .route(
            "/api/documents",
            get(handlers::documents::list_documents)
                .post(handlers::documents::upload_document),
        )
        .route(
            "/api/documents/{document_id}",
            delete(handlers::documents::delete_document),
        )
        .route("/api/species", get(handlers::botany::list_species))
        .route("/api/diseases", get(handlers::botany::list_diseases))
        .route("/api/chatbot", post(handlers::chatbot::chat))
        .layer(tower_governor::GovernorLayer::new(
            protected_governor_conf.clone(),
        ))
        .route_layer(from_fn(middleware_layer::csrf::verify_csrf))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_session,
        ))
        .with_state(state.clone());

    let page_routes = Router::new()
        .fallback_service(ServeDir::new(PAGES_DIR))
        .layer(from_fn_with_state(
            state.clone(),
            middleware_layer::guard::page_guard,
        ));

    Router::new()
        .merge(auth_routes)
        .merge(protected_routes)
        .merge(page_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
}
