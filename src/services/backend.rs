use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, Result};

/// A backend response relayed to the dashboard unchanged.
///
/// `body` is the backend's own JSON text; nothing at this layer reshapes
/// success payloads.
#[derive(Debug)]
pub struct Relayed {
    /// The backend's HTTP status.
    pub status: StatusCode,
    /// The backend's JSON body, verbatim.
    pub body: String,
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

/// Error shape most backend endpoints use for rejections.
#[derive(Deserialize)]
struct BackendMessage {
    message: Option<String>,
    error: Option<String>,
}

/// Extracts a human-readable message from a backend error body.
pub(crate) fn extract_message(body: &str, status: StatusCode) -> String {
    if let Ok(parsed) = sonic_rs::from_str::<BackendMessage>(body) {
        if let Some(message) = parsed.message.or(parsed.error) {
            if !message.is_empty() {
                return message;
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Backend request failed")
        .to_string()
}

/// A thin client for one upstream REST API.
///
/// Every proxy endpoint goes through here: build the outbound request, attach
/// the bearer token, relay status and body back. No retries, no caching.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a new `BackendClient` for the given base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the outbound URL for a fixed path plus an optional raw query.
    fn url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(query) if !query.is_empty() => format!("{}{}?{}", self.base_url, path, query),
            _ => format!("{}{}", self.base_url, path),
        }
    }

    /// Attaches the bearer token when the target API expects one.
    fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Forwards a GET request, passing the caller's query string through.
    pub async fn get(
        &self,
        path: &str,
        query: Option<&str>,
        token: Option<&str>,
    ) -> Result<Relayed> {
        let request = self.http.get(self.url(path, query));
        self.relay(Self::authorize(request, token)).await
    }

    /// Forwards a DELETE request.
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<Relayed> {
        let request = self.http.delete(self.url(path, None));
        self.relay(Self::authorize(request, token)).await
    }

    /// Forwards a typed JSON body with the given method.
    pub async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Relayed> {
        let request = self.http.request(method, self.url(path, None)).json(body);
        self.relay(Self::authorize(request, token)).await
    }

    /// Forwards an already-encoded JSON body verbatim.
    pub async fn send_raw_json(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: Vec<u8>,
    ) -> Result<Relayed> {
        let request = self
            .http
            .request(method, self.url(path, None))
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);
        self.relay(Self::authorize(request, token)).await
    }

    /// Forwards a multipart form.
    ///
    /// The content type stays untouched so the client generates the boundary.
    pub async fn post_multipart(
        &self,
        path: &str,
        token: Option<&str>,
        form: reqwest::multipart::Form,
    ) -> Result<Relayed> {
        let request = self.http.post(self.url(path, None)).multipart(form);
        self.relay(Self::authorize(request, token)).await
    }

    /// Sends the request and maps the outcome onto the relay contract.
    ///
    /// 2xx responses pass through with their body (an unparseable success body
    /// degrades to `{}` instead of failing the request). Non-2xx responses
    /// become `BackendRejected` carrying the backend's status and a
    /// best-effort message. Network failures become `BackendUnavailable`.
    async fn relay(&self, request: RequestBuilder) -> Result<Relayed> {
        let response = request.send().await.map_err(|e| {
            AppError::BackendUnavailable(format!("Failed to reach backend: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::BackendUnavailable(format!("Failed to read backend response: {}", e))
        })?;

        if status.is_success() {
            let body = if body.is_empty()
                || sonic_rs::from_str::<sonic_rs::Value>(&body).is_err()
            {
                "{}".to_string()
            } else {
                body
            };
            return Ok(Relayed { status, body });
        }

        Err(AppError::BackendRejected {
            status,
            message: extract_message(&body, status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_urls_with_and_without_query() {
        let client = BackendClient::new("http://localhost:8081/").unwrap();

        assert_eq!(
            client.url("/api/users", None),
            "http://localhost:8081/api/users"
        );
        assert_eq!(
            client.url("/api/documents", Some("page=2&size=10")),
            "http://localhost:8081/api/documents?page=2&size=10"
        );
        assert_eq!(
            client.url("/api/users", Some("")),
            "http://localhost:8081/api/users"
        );
    }

    #[test]
    fn extracts_backend_error_messages() {
        let status = StatusCode::NOT_FOUND;

        assert_eq!(
            extract_message(r#"{"message":"Document not found"}"#, status),
            "Document not found"
        );
        assert_eq!(
            extract_message(r#"{"error":"bad id"}"#, status),
            "bad id"
        );
        assert_eq!(extract_message("plain text failure", status), "plain text failure");
        assert_eq!(extract_message("", status), "Not Found");
    }
}
