// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Page guard middleware.
//!
//! Every page request passes through [`RouteGuard::evaluate`]. The outcome
//! maps onto HTTP as follows:
//!
//! | Outcome       | Response                                             |
//! |---------------|------------------------------------------------------|
//! | `Render`      | inner service, with [`RenderedDestination`] attached |
//! | `RedirectTo`  | `303 See Other` with `Location`                      |
//! | `ShowLoading` | `503 Service Unavailable` with `Retry-After: 1`      |
//!
//! JSON endpoints under `/api/` and `/health` itself are not pages and
//! bypass the guard; they check the session themselves.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    Json,
    body::Body,
    http::{HeaderValue, Request, StatusCode, header},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use vms_core::{Destination, GuardOutcome, Redirect, RouteGuard};

use crate::error::ApiError;
use crate::middleware::session::SessionContext;

/// Query parameter carrying the destination to return to after sign-in.
pub const REDIRECT_PARAM: &str = "redirect";

const API_PREFIX: &str = "/api";
const HEALTH_PATH: &str = "/health";

/// The destination the guard decided to render, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDestination(pub Destination);

// =============================================================================
// GuardLayer
// =============================================================================

/// Layer enforcing the route guard on page requests.
#[derive(Clone)]
pub struct GuardLayer {
    guard: Arc<RouteGuard>,
}

impl GuardLayer {
    /// Creates a new guard layer.
    pub fn new(guard: Arc<RouteGuard>) -> Self {
        Self { guard }
    }
}

impl<S> Layer<S> for GuardLayer {
    type Service = GuardMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GuardMiddleware {
            inner,
            guard: self.guard.clone(),
        }
    }
}

// =============================================================================
// GuardMiddleware
// =============================================================================

/// Middleware for route guard enforcement.
#[derive(Clone)]
pub struct GuardMiddleware<S> {
    inner: S,
    guard: Arc<RouteGuard>,
}

impl<S> Service<Request<Body>> for GuardMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let path = req.uri().path().to_string();
        let mut inner = self.inner.clone();

        if is_bypassed(&path) {
            return Box::pin(async move { inner.call(req).await });
        }

        let destination = match Destination::parse(&path) {
            Ok(destination) => destination,
            Err(e) => {
                let response = ApiError::bad_request(e.to_string()).into_response();
                return Box::pin(async move { Ok(response) });
            }
        };

        let session = req
            .extensions()
            .get::<SessionContext>()
            .map(|ctx| ctx.state.clone())
            .unwrap_or(vms_core::SessionState::Absent);

        match self.guard.evaluate(&session, &destination) {
            GuardOutcome::Render { destination } => {
                req.extensions_mut().insert(RenderedDestination(destination));
                Box::pin(async move { inner.call(req).await })
            }
            GuardOutcome::RedirectTo(redirect) => {
                let response = redirect_response(&redirect);
                Box::pin(async move { Ok(response) })
            }
            GuardOutcome::ShowLoading => {
                let response = loading_response();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn is_bypassed(path: &str) -> bool {
    if path == HEALTH_PATH {
        return true;
    }
    path.strip_prefix(API_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Builds the `Location` value for a redirect.
pub fn redirect_location(redirect: &Redirect) -> String {
    match &redirect.return_to {
        Some(return_to) => format!(
            "{}?{}={}",
            redirect.destination,
            REDIRECT_PARAM,
            encode_query_value(return_to.as_str())
        ),
        None => redirect.destination.to_string(),
    }
}

fn redirect_response(redirect: &Redirect) -> Response {
    let location = redirect_location(redirect);
    match HeaderValue::from_str(&location) {
        Ok(value) => {
            let mut response = StatusCode::SEE_OTHER.into_response();
            response.headers_mut().insert(header::LOCATION, value);
            response
        }
        Err(e) => ApiError::internal(format!("invalid redirect location '{location}': {e}"))
            .into_response(),
    }
}

fn loading_response() -> Response {
    let mut response = (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(GuardOutcome::ShowLoading),
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
    response
}

/// Percent-encodes a path for a query value, keeping `/` readable.
fn encode_query_value(value: &str) -> String {
    value
        .split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use tower::ServiceExt;
    use vms_core::{Principal, RedirectReason, SessionState};

    fn mock_service() -> impl Service<
        Request<Body>,
        Response = Response,
        Error = Infallible,
        Future = impl Future<Output = Result<Response, Infallible>> + Send,
    > + Clone
    + Send {
        tower::service_fn(|req: Request<Body>| async move {
            let rendered = req
                .extensions()
                .get::<RenderedDestination>()
                .map(|r| r.0.to_string())
                .unwrap_or_default();
            Ok::<_, Infallible>(Response::new(Body::from(rendered)))
        })
    }

    fn request(path: &str, state: SessionState) -> Request<Body> {
        let mut req = Request::builder().uri(path).body(Body::empty()).unwrap();
        req.extensions_mut().insert(SessionContext { token: None, state });
        req
    }

    fn layer() -> GuardLayer {
        GuardLayer::new(Arc::new(RouteGuard::standard()))
    }

    #[tokio::test]
    async fn test_render_passes_through() {
        let service = layer().layer(mock_service());
        let state = SessionState::Present(Principal::new("A", "admin"));
        let response = service.oneshot(request("/user-management/", state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"/user-management");
    }

    #[tokio::test]
    async fn test_absent_redirects_with_return() {
        let service = layer().layer(mock_service());
        let response = service
            .oneshot(request("/check-in", SessionState::Absent))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/login?redirect=/check-in"
        );
    }

    #[tokio::test]
    async fn test_loading_is_503() {
        let service = layer().layer(mock_service());
        let response = service
            .oneshot(request("/check-in", SessionState::Loading))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], "1");
    }

    #[tokio::test]
    async fn test_api_bypasses_guard() {
        let service = layer().layer(mock_service());
        let response = service
            .oneshot(request("/api/navigation", SessionState::Absent))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_only_exact_health_bypasses_guard() {
        for path in ["/healthz", "/health-report", "/apix"] {
            let service = layer().layer(mock_service());
            let response = service
                .oneshot(request(path, SessionState::Absent))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        }

        assert!(is_bypassed("/health"));
        assert!(is_bypassed("/api"));
        assert!(is_bypassed("/api/session"));
    }

    #[test]
    fn test_redirect_location_encoding() {
        let redirect = Redirect {
            destination: Destination::parse("/login").unwrap(),
            return_to: Some(Destination::parse("/reports/a&b").unwrap()),
            reason: RedirectReason::Unauthenticated,
        };
        assert_eq!(redirect_location(&redirect), "/login?redirect=/reports/a%26b");

        let redirect = Redirect {
            return_to: Some(Destination::parse("/visitor-log/ü").unwrap()),
            ..redirect
        };
        assert_eq!(
            redirect_location(&redirect),
            "/login?redirect=/visitor-log/%C3%BC"
        );
    }
}
