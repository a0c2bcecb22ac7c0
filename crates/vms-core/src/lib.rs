// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # vms-core
//!
//! Role-based navigation and route authorization for the visitor management
//! system.
//!
//! This crate provides the authorization model shared by every VMS surface:
//!
//! - **Role**: The closed set of principal roles and role-key normalization
//! - **Destination**: Normalized screen paths
//! - **Navigation**: The per-role menu table, the single source of permission
//! - **Resolver**: Flattening a role's menu into its allowed destinations
//! - **Dashboard**: Role home destinations with a denial fall-through
//! - **Guard**: The render/redirect/loading decision for each navigation
//! - **Session**: Principal, session state, directories and stores
//! - **Denial**: The access-denied screen and its recovery action
//! - **Consistency**: Design-time drift detection
//!
//! ## Example
//!
//! ```rust
//! use vms_core::{Destination, GuardOutcome, Principal, RouteGuard, SessionState};
//!
//! let guard = RouteGuard::standard();
//! let session = SessionState::Present(Principal::new("Ada", "admin"));
//!
//! let outcome = guard.evaluate(&session, &Destination::parse("/user-management").unwrap());
//! assert!(outcome.is_render());
//!
//! let outcome = guard.evaluate(&session, &Destination::parse("/").unwrap());
//! assert_eq!(outcome.redirect_target().unwrap().as_str(), "/admindashboard");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Model Modules
// =============================================================================

pub mod destination;
pub mod error;
pub mod navigation;
pub mod role;

// =============================================================================
// Authorization Modules
// =============================================================================

pub mod consistency;
pub mod dashboard;
pub mod denial;
pub mod guard;
pub mod resolver;

// =============================================================================
// Session Modules
// =============================================================================

pub mod session;

// =============================================================================
// Re-exports for convenience
// =============================================================================

pub use error::*;

pub use consistency::{ConfigDefect, DeclaredRoute};
pub use dashboard::DashboardResolver;
pub use denial::{DenialScreen, RecoveryAction};
pub use destination::{DASHBOARD_ALIAS_PATH, DENIED_PATH, Destination, LOGIN_PATH, ROOT_PATH};
pub use guard::{GuardOutcome, GuardPaths, Redirect, RedirectReason, RouteGuard};
pub use navigation::{NavLink, NavigationEntry, NavigationTable, NavigationTableBuilder};
pub use resolver::{AllowedSet, flatten, resolve_allowed};
pub use role::{Role, normalize_role_key};
pub use session::{
    Credentials, DirectoryUser, InMemorySessionStore, Principal, SessionState, SessionStore,
    StaticUserDirectory, UserDirectory, hash_password, is_password_hash, verify_password,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports.
pub mod prelude {
    pub use crate::dashboard::DashboardResolver;
    pub use crate::destination::Destination;
    pub use crate::error::{AccessError, AccessResult, SessionError, SessionResult};
    pub use crate::guard::{GuardOutcome, RouteGuard};
    pub use crate::navigation::{NavigationEntry, NavigationTable};
    pub use crate::resolver::AllowedSet;
    pub use crate::role::Role;
    pub use crate::session::{Principal, SessionState, SessionStore};
}
