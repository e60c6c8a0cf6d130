//! Admission middleware for the edge router.
//!
//! Every inbound request passes through [`AdmissionLayer`] before it is
//! proxied:
//!
//! 1. Resolve the client IP ([`crate::client_ip`]).
//! 2. Select the policy by path: authentication endpoints get the strict
//!    limiter (slows credential guessing), everything else the general
//!    API limiter.
//! 3. Rejected requests are answered directly with `429` and a
//!    `Retry-After` value; admitted requests continue to the proxy.
//! 4. Every response — admitted or rejected — carries
//!    `X-RateLimit-Limit`, `X-RateLimit-Remaining` and
//!    `X-RateLimit-Reset` so clients can pace themselves.

use crate::client_ip::client_ip;
use crate::limiter::{AdmissionDecision, SlidingWindowLimiter};
use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::{Layer, Service};

/// Path prefix that selects the strict authentication limiter.
pub const AUTH_LIMIT_PREFIX: &str = "/auth/token";

/// Header reporting the configured per-window limit.
pub const LIMIT_HEADER: &str = "X-RateLimit-Limit";
/// Header reporting the requests left in the current window.
pub const REMAINING_HEADER: &str = "X-RateLimit-Remaining";
/// Header reporting the window size in seconds.
pub const RESET_HEADER: &str = "X-RateLimit-Reset";

/// The two independently configured admission policies of the edge.
#[derive(Debug)]
pub struct AdmissionControl {
    /// Strict limiter for authentication endpoints.
    auth: SlidingWindowLimiter,
    /// General limiter for everything else.
    api: SlidingWindowLimiter,
}

impl AdmissionControl {
    /// Create the two policy instances.
    #[must_use]
    pub fn new(
        auth_max: u32,
        auth_window: Duration,
        api_max: u32,
        api_window: Duration,
    ) -> Self {
        Self {
            auth: SlidingWindowLimiter::new(auth_max, auth_window),
            api: SlidingWindowLimiter::new(api_max, api_window),
        }
    }

    /// Policy selection is by request path prefix, decided here at the
    /// edge — the limiters themselves know nothing about routes.
    #[must_use]
    pub fn limiter_for(&self, path: &str) -> &SlidingWindowLimiter {
        if path.starts_with(AUTH_LIMIT_PREFIX) {
            &self.auth
        } else {
            &self.api
        }
    }
}

/// Create a layer enforcing admission control on all requests.
#[must_use]
pub fn admission_layer(control: Arc<AdmissionControl>) -> AdmissionLayer {
    AdmissionLayer { control }
}

/// Layer wrapping services with admission control.
#[derive(Clone, Debug)]
pub struct AdmissionLayer {
    /// Shared limiter state.
    control: Arc<AdmissionControl>,
}

impl<S> Layer<S> for AdmissionLayer {
    type Service = AdmissionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AdmissionMiddleware {
            inner,
            control: Arc::clone(&self.control),
        }
    }
}

/// Middleware service enforcing admission control.
#[derive(Clone, Debug)]
pub struct AdmissionMiddleware<S> {
    inner: S,
    control: Arc<AdmissionControl>,
}

impl<S> Service<Request> for AdmissionMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Error: Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let path = req.uri().path().to_owned();
        let client = client_ip(req.headers(), req.extensions());
        let is_auth = path.starts_with(AUTH_LIMIT_PREFIX);

        let limiter = self.control.limiter_for(&path);
        let limit = limiter.max_requests();
        let reset_secs = limiter.window().as_secs();
        let decision = limiter.check(client);

        if !decision.allowed {
            tracing::warn!(
                client = %client,
                path = %path,
                auth_endpoint = is_auth,
                retry_after_secs = decision.retry_after_secs,
                "rate limit exceeded"
            );
            let response = rejection_response(is_auth, decision, limit, reset_secs);
            return Box::pin(std::future::ready(Ok(response)));
        }

        let fut = self.inner.call(req);
        Box::pin(async move {
            let mut response = fut.await?;
            stamp_rate_limit_headers(&mut response, limit, decision.remaining, reset_secs);
            Ok(response)
        })
    }
}

/// Build the 429 response for a rejected request.
fn rejection_response(
    is_auth: bool,
    decision: AdmissionDecision,
    limit: u32,
    reset_secs: u64,
) -> Response {
    let detail = if is_auth {
        format!(
            "Too many login attempts. Please retry in {} seconds.",
            decision.retry_after_secs
        )
    } else {
        format!(
            "Too many requests. Please retry in {} seconds.",
            decision.retry_after_secs
        )
    };

    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "detail": detail })),
    )
        .into_response();

    if let Ok(value) = HeaderValue::from_str(&decision.retry_after_secs.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    stamp_rate_limit_headers(&mut response, limit, 0, reset_secs);
    response
}

/// Attach the `X-RateLimit-*` metadata expected on every edge response.
fn stamp_rate_limit_headers(response: &mut Response, limit: u32, remaining: u32, reset_secs: u64) {
    let headers = response.headers_mut();
    for (name, value) in [
        (LIMIT_HEADER, limit.to_string()),
        (REMAINING_HEADER, remaining.to_string()),
        (RESET_HEADER, reset_secs.to_string()),
    ] {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    }
}
