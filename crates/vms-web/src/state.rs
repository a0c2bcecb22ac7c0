// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use vms_config::{ApiConfig, VmsConfig};
use vms_core::RouteGuard;

use crate::error::{ApiError, ApiResult};
use crate::registry::SessionRegistry;

// =============================================================================
// WebSettings
// =============================================================================

/// Server settings taken from the `api` configuration section.
#[derive(Debug, Clone)]
pub struct WebSettings {
    /// Listen address.
    pub addr: SocketAddr,
    /// Session cookie name.
    pub session_cookie: String,
    /// Mark the session cookie `Secure`.
    pub secure_cookie: bool,
    /// Idle lifetime of a session.
    pub session_ttl: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
}

impl From<&ApiConfig> for WebSettings {
    fn from(config: &ApiConfig) -> Self {
        Self {
            addr: config.socket_addr(),
            session_cookie: config.session_cookie.clone(),
            secure_cookie: config.secure_cookie,
            session_ttl: config.session_ttl(),
            request_timeout: config.request_timeout(),
        }
    }
}

impl Default for WebSettings {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The route guard.
    pub guard: Arc<RouteGuard>,
    /// Open sessions.
    pub sessions: Arc<SessionRegistry>,
    /// Server settings.
    pub settings: Arc<WebSettings>,
}

impl AppState {
    /// Creates the state from its parts.
    pub fn new(guard: RouteGuard, sessions: SessionRegistry, settings: WebSettings) -> Self {
        Self {
            guard: Arc::new(guard),
            sessions: Arc::new(sessions),
            settings: Arc::new(settings),
        }
    }

    /// Builds the guard, user directory and settings from configuration.
    pub fn from_config(config: &VmsConfig) -> ApiResult<Self> {
        let guard = config
            .route_guard()
            .map_err(|e| ApiError::internal(e.to_string()))?;
        let directory = config
            .user_directory()
            .map_err(|e| ApiError::internal(e.to_string()))?;
        Ok(Self::new(
            guard,
            SessionRegistry::new(Arc::new(directory)).with_ttl(config.api.session_ttl()),
            WebSettings::from(&config.api),
        ))
    }

    /// Returns the route guard.
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Returns the session registry.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}
