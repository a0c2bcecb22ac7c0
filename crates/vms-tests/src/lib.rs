// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # VMS Integration Tests
//!
//! Integration tests for the VMS access layer, with the fixtures, builders
//! and assertions they share.
//!
//! ## Module Structure
//!
//! - [`common`]: shared test utilities
//!   - `fixtures`: principals, accounts and configuration documents
//!   - `builders`: [`vms_web::AppState`] and HTTP request builders
//!   - `assertions`: guard outcome and HTTP response assertions
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p vms-tests
//! cargo test -p vms-tests --test integration_guard
//! cargo test -p vms-tests --test integration_config
//! cargo test -p vms-tests --test integration_web
//! ```
//!
//! ## Test Categories
//!
//! ### Guard Tests (`integration_guard.rs`)
//! - Menu / allowed-set agreement for every role
//! - The acceptance scenarios (security guard, user, manager drift, unknown
//!   role, loading)
//! - Denial screen recovery actions
//!
//! ### Config Tests (`integration_config.rs`)
//! - YAML, TOML and JSON documents
//! - Validation rules and role key hints
//! - Consistency reports
//!
//! ### Web Tests (`integration_web.rs`)
//! - Redirects, denial and loading responses through the full router
//! - Sign-in, sign-out and the navigation API
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use vms_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (_state, app) = AppStateBuilder::new().with_standard_accounts().build_router();
//!     let response = app.oneshot(TestRequest::get("/check-in").build()).await.unwrap();
//!     assert_redirect(&response, "/login?redirect=/check-in");
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::{init_test_logging, temp_config_file};
}
