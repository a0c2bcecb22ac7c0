// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Builders for application state and HTTP requests with sensible defaults.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, header};
use uuid::Uuid;
use vms_config::VmsConfig;
use vms_core::{DirectoryUser, Role, StaticUserDirectory};
use vms_web::{AppState, SessionRegistry, WebServer, WebSettings};

use super::fixtures::AccountFixtures;

// =============================================================================
// AppState Builder
// =============================================================================

/// Builder for [`AppState`] backed by an in-memory directory.
#[derive(Debug, Clone, Default)]
pub struct AppStateBuilder {
    config: VmsConfig,
    directory: StaticUserDirectory,
}

impl AppStateBuilder {
    /// Starts from the built-in configuration and an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration. Accounts in `config.users` are ignored;
    /// add them with [`Self::with_account`].
    pub fn config(mut self, config: VmsConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds an account.
    pub fn with_account(mut self, email: &str, user: DirectoryUser) -> Self {
        self.directory.insert(email, user);
        self
    }

    /// Adds one active account per role plus a disabled one.
    pub fn with_standard_accounts(mut self) -> Self {
        for role in Role::ALL {
            self.directory
                .insert(&AccountFixtures::email(role), AccountFixtures::account(role));
        }
        self.directory
            .insert(AccountFixtures::disabled_email(), AccountFixtures::disabled());
        self
    }

    /// Builds the state.
    pub fn build(self) -> AppState {
        let guard = self
            .config
            .route_guard()
            .expect("Failed to build route guard from test config");
        AppState::new(
            guard,
            SessionRegistry::new(Arc::new(self.directory)).with_ttl(self.config.api.session_ttl()),
            WebSettings::from(&self.config.api),
        )
    }

    /// Builds the state and the full router around it.
    pub fn build_router(self) -> (AppState, Router) {
        let state = self.build();
        let router = WebServer::new(state.clone()).router();
        (state, router)
    }
}

// =============================================================================
// Request Builder
// =============================================================================

/// How a request carries its session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTransport {
    /// `Cookie: <name>=<token>`.
    Cookie,
    /// `Authorization: Bearer <token>`.
    Bearer,
}

/// Builder for HTTP requests against the router.
#[derive(Debug, Clone)]
pub struct TestRequest {
    method: Method,
    uri: String,
    token: Option<(Uuid, TokenTransport)>,
    cookie_name: String,
    json: Option<serde_json::Value>,
}

impl TestRequest {
    /// Creates a request.
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            token: None,
            cookie_name: vms_config::schema::DEFAULT_SESSION_COOKIE.to_string(),
            json: None,
        }
    }

    /// A GET request.
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }

    /// A POST request.
    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(Method::POST, uri)
    }

    /// A DELETE request.
    pub fn delete(uri: impl Into<String>) -> Self {
        Self::new(Method::DELETE, uri)
    }

    /// Sends the token in the default session cookie.
    pub fn cookie(mut self, token: Uuid) -> Self {
        self.token = Some((token, TokenTransport::Cookie));
        self
    }

    /// Sends the token as a bearer credential.
    pub fn bearer(mut self, token: Uuid) -> Self {
        self.token = Some((token, TokenTransport::Bearer));
        self
    }

    /// Overrides the session cookie name.
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Sets a JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Builds the request.
    pub fn build(self) -> Request<Body> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);

        match self.token {
            Some((token, TokenTransport::Cookie)) => {
                builder = builder.header(header::COOKIE, format!("{}={}", self.cookie_name, token));
            }
            Some((token, TokenTransport::Bearer)) => {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            None => {}
        }

        let body = match self.json {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        builder.body(body).expect("Failed to build test request")
    }
}
