// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session resolution middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{HeaderMap, Request, header},
    response::Response,
};
use cookie::{Cookie, CookieBuilder, SameSite};
use tower::{Layer, Service};
use uuid::Uuid;
use vms_core::SessionState;

use crate::registry::SessionRegistry;
use crate::state::WebSettings;

// =============================================================================
// SessionContext
// =============================================================================

/// The session of the current request, stored in request extensions.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Token presented by the client, if it parsed.
    pub token: Option<Uuid>,
    /// Session snapshot.
    pub state: SessionState,
}

impl SessionContext {
    /// A request without a session.
    pub fn absent() -> Self {
        Self {
            token: None,
            state: SessionState::Absent,
        }
    }
}

// =============================================================================
// SessionLayer
// =============================================================================

/// Layer that resolves the request's session.
///
/// The token is read from the session cookie, then from an
/// `Authorization: Bearer` header.
#[derive(Clone)]
pub struct SessionLayer {
    registry: Arc<SessionRegistry>,
    cookie_name: Arc<str>,
}

impl SessionLayer {
    /// Creates a new session layer.
    pub fn new(registry: Arc<SessionRegistry>, cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            registry,
            cookie_name: cookie_name.into(),
        }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionMiddleware {
            inner,
            registry: self.registry.clone(),
            cookie_name: self.cookie_name.clone(),
        }
    }
}

// =============================================================================
// SessionMiddleware
// =============================================================================

/// Middleware that inserts a [`SessionContext`] into every request.
#[derive(Clone)]
pub struct SessionMiddleware<S> {
    inner: S,
    registry: Arc<SessionRegistry>,
    cookie_name: Arc<str>,
}

impl<S> Service<Request<Body>> for SessionMiddleware<S>
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
        let token = extract_token(req.headers(), &self.cookie_name);
        let state = self.registry.state(token.as_ref());
        tracing::trace!(
            path = %req.uri().path(),
            session = state.kind(),
            "Session resolved for request"
        );
        req.extensions_mut().insert(SessionContext { token, state });

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the session token from the cookie or bearer header.
pub(crate) fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    cookie_value(headers, cookie_name)
        .or_else(|| extract_bearer_token(headers))
        .and_then(|raw| SessionRegistry::parse_token(&raw))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value_trimmed().to_string())
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer ").map(|s| s.to_string()))
}

fn base_cookie(settings: &WebSettings, value: String) -> CookieBuilder<'static> {
    Cookie::build((settings.session_cookie.clone(), value))
        .path("/")
        .http_only(true)
        .secure(settings.secure_cookie)
        .same_site(SameSite::Lax)
}

/// Builds the `Set-Cookie` value that stores a session token.
///
/// The cookie lives as long as an idle session does.
pub fn session_cookie(settings: &WebSettings, token: &Uuid) -> String {
    let max_age = i64::try_from(settings.session_ttl.as_secs()).unwrap_or(i64::MAX);
    base_cookie(settings, token.to_string())
        .max_age(cookie::time::Duration::seconds(max_age))
        .build()
        .to_string()
}

/// Builds the `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie(settings: &WebSettings) -> String {
    let mut cookie = base_cookie(settings, String::new()).build();
    cookie.make_removal();
    cookie.to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token_from_cookie() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; vms_session={token}")).unwrap(),
        );
        assert_eq!(extract_token(&headers, "vms_session"), Some(token));
        assert_eq!(extract_token(&headers, "other"), None);
    }

    #[test]
    fn test_extract_token_from_bearer() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        assert_eq!(extract_token(&headers, "vms_session"), Some(token));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_token(&headers, "vms_session"), None);
    }

    #[test]
    fn test_extract_token_from_quoted_cookie() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("vms_session=\"{token}\"; theme=dark")).unwrap(),
        );
        assert_eq!(extract_token(&headers, "vms_session"), Some(token));
    }

    #[test]
    fn test_malformed_token_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("vms_session=garbage"));
        assert_eq!(extract_token(&headers, "vms_session"), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let settings = WebSettings::default();
        let cookie = session_cookie(&settings, &Uuid::nil());
        assert!(cookie.starts_with("vms_session=00000000-"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains(&format!("Max-Age={}", settings.session_ttl.as_secs())));

        let cleared = clear_session_cookie(&settings);
        assert!(cleared.starts_with("vms_session=;"));
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn test_cookie_secure_flag_is_configurable() {
        let settings = WebSettings {
            secure_cookie: false,
            ..WebSettings::default()
        };
        assert!(!session_cookie(&settings, &Uuid::nil()).contains("Secure"));
    }
}
