// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # vms-web
//!
//! HTTP adapter for the VMS access layer.
//!
//! Every page request passes through two layers before reaching a handler:
//! [`middleware::SessionLayer`] resolves the session from the cookie or bearer
//! token, then [`middleware::GuardLayer`] asks the [`vms_core::RouteGuard`]
//! whether to render, redirect or wait. The JSON API under `/api` exposes
//! sign-in, sign-out, the principal's menu and a dry-run of the guard.
//!
//! ```rust,no_run
//! use vms_config::VmsConfig;
//! use vms_web::{AppState, WebServer};
//!
//! # async fn run() -> Result<(), vms_web::ApiError> {
//! let state = AppState::from_config(&VmsConfig::default())?;
//! WebServer::new(state)
//!     .run_with_shutdown(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod registry;
pub mod response;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use registry::SessionRegistry;
pub use server::WebServer;
pub use state::{AppState, WebSettings};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
