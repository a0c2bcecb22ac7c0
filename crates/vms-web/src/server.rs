// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Web server implementation.

use std::net::SocketAddr;

use axum::{
    Router,
    http::StatusCode,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{GuardLayer, SessionLayer};
use crate::state::AppState;

// =============================================================================
// WebServer
// =============================================================================

/// The HTTP server.
pub struct WebServer {
    state: AppState,
}

impl WebServer {
    /// Creates a new server with the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Creates the router with all routes and middleware.
    ///
    /// Layers run outermost first: tracing, timeout, session, guard.
    pub fn router(&self) -> Router {
        let settings = &self.state.settings;
        let denied_path = self.state.guard.paths().denied.to_string();

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                settings.request_timeout,
            ))
            .layer(SessionLayer::new(
                self.state.sessions.clone(),
                settings.session_cookie.as_str(),
            ))
            .layer(GuardLayer::new(self.state.guard.clone()));

        Router::new()
            // Liveness (not guarded)
            .route("/health", get(handlers::health))
            // Session API
            .route(
                "/api/session",
                get(handlers::current_session)
                    .post(handlers::sign_in)
                    .delete(handlers::sign_out),
            )
            // Navigation API
            .route("/api/navigation", get(handlers::navigation))
            .route("/api/guard", get(handlers::evaluate))
            // Guarded pages
            .route(&denied_path, get(handlers::denied))
            .fallback(handlers::page)
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.addr();
        let router = self.router();

        info!("Starting web server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("Web server shutdown complete");
        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.state.settings.addr
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::ServiceExt;
    use vms_config::VmsConfig;

    fn server() -> WebServer {
        WebServer::new(AppState::from_config(&VmsConfig::default()).unwrap())
    }

    #[test]
    fn test_default_addr() {
        assert_eq!(server().addr().port(), 8080);
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_without_session_goes_to_login() {
        let response = server()
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login?redirect=/");
    }
}
