//! Reverse proxy to the backend services.
//!
//! The gateway forwards by path prefix: `/auth` to the identity service,
//! `/tickets` to the ticketing service, `/validation` to the validation
//! service. The prefix is stripped, everything after it (including query
//! parameters) is passed through verbatim, and the backend's response is
//! relayed as-is. A backend that cannot be reached surfaces as `503` with
//! the service named — never as a silent retry.

use crate::error::GatewayError;
use axum::{
    body::Body,
    extract::{Request, State},
    response::Response,
};
use http::{header, HeaderMap, Method};

/// Upper bound on a buffered request body (2 MiB).
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Backend services reachable through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    /// Identity service (`/auth`).
    Auth,
    /// Ticketing service (`/tickets`).
    Tickets,
    /// Validation service (`/validation`).
    Validation,
}

impl Upstream {
    /// Gateway path prefix routed to this service.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Auth => "/auth",
            Self::Tickets => "/tickets",
            Self::Validation => "/validation",
        }
    }

    /// Logical service name, used in logs and error bodies.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Tickets => "tickets",
            Self::Validation => "validation",
        }
    }
}

/// Base URLs of the backend services.
#[derive(Debug, Clone)]
pub struct Upstreams {
    /// Identity service base URL.
    pub auth: String,
    /// Ticketing service base URL.
    pub tickets: String,
    /// Validation service base URL.
    pub validation: String,
}

impl Upstreams {
    /// Base URL for `upstream`.
    #[must_use]
    pub fn base(&self, upstream: Upstream) -> &str {
        match upstream {
            Upstream::Auth => &self.auth,
            Upstream::Tickets => &self.tickets,
            Upstream::Validation => &self.validation,
        }
    }
}

/// Shared gateway state.
#[derive(Debug, Clone)]
pub struct GatewayState {
    /// Reused HTTP client for upstream calls.
    pub http: reqwest::Client,
    /// Backend base URLs.
    pub upstreams: Upstreams,
}

/// Forward a request under `/auth`.
pub async fn auth_route(State(state): State<GatewayState>, req: Request) -> Response {
    forward(&state, Upstream::Auth, req).await
}

/// Forward a request under `/tickets`.
pub async fn tickets_route(State(state): State<GatewayState>, req: Request) -> Response {
    forward(&state, Upstream::Tickets, req).await
}

/// Forward a request under `/validation`.
pub async fn validation_route(State(state): State<GatewayState>, req: Request) -> Response {
    forward(&state, Upstream::Validation, req).await
}

/// Forward `req` to `upstream`, relaying the backend response verbatim.
async fn forward(state: &GatewayState, upstream: Upstream, req: Request) -> Response {
    match try_forward(state, upstream, req).await {
        Ok(response) => response,
        Err(err) => axum::response::IntoResponse::into_response(err),
    }
}

async fn try_forward(
    state: &GatewayState,
    upstream: Upstream,
    req: Request,
) -> Result<Response, GatewayError> {
    let method = req.method().clone();
    if !matches!(
        method,
        Method::GET | Method::POST | Method::PUT | Method::DELETE
    ) {
        return Err(GatewayError::MethodNotAllowed(method));
    }

    let target = target_url(state.upstreams.base(upstream), upstream, req.uri());
    let headers = forwardable_headers(req.headers());

    let body = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|_| GatewayError::UnreadableBody)?;

    tracing::debug!(service = upstream.name(), %method, target = %target, "forwarding request");

    let mut builder = state.http.request(method, &target).headers(headers);
    if !body.is_empty() {
        builder = builder.body(body);
    }

    let upstream_response = builder.send().await.map_err(|source| GatewayError::Unavailable {
        service: upstream.name(),
        source,
    })?;

    relay(upstream_response).await
}

/// Build the upstream URL: base + path remainder + original query.
fn target_url(base: &str, upstream: Upstream, uri: &http::Uri) -> String {
    let rest = uri
        .path()
        .strip_prefix(upstream.prefix())
        .unwrap_or_default();
    match uri.query() {
        Some(query) => format!("{base}{rest}?{query}"),
        None => format!("{base}{rest}"),
    }
}

/// Copy request headers, dropping the ones that belong to the gateway's
/// own connection.
fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in headers {
        if name == header::HOST || name == header::CONTENT_LENGTH {
            continue;
        }
        out.append(name, value.clone());
    }
    out
}

/// Convert the backend response into an axum response.
async fn relay(upstream_response: reqwest::Response) -> Result<Response, GatewayError> {
    let status = upstream_response.status();
    let mut headers = HeaderMap::new();
    for (name, value) in upstream_response.headers() {
        if name == header::TRANSFER_ENCODING || name == header::CONNECTION {
            continue;
        }
        headers.append(name, value.clone());
    }

    let bytes = upstream_response
        .bytes()
        .await
        .unwrap_or_default();

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
