// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # vms-config
//!
//! Configuration management for the visitor management system.
//!
//! ## Features
//!
//! - **Schema Definition**: Navigation, dashboards, routing, users, API and logging
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `${VAR:default}` placeholders and `VMS_*` variables
//! - **Model Building**: Navigation table, dashboards, guard and user directory
//! - **Consistency Report**: Drift between navigation and declared route roles
//!
//! ## Quick Start
//!
//! ```no_run
//! use vms_config::loader::load_config;
//!
//! let config = load_config("vms.yaml").unwrap();
//! let guard = config.route_guard().unwrap();
//!
//! for defect in config.consistency_report().unwrap() {
//!     println!("{defect}");
//! }
//! ```
//!
//! ## Configuration Schema
//!
//! - `app` - Application name and environment
//! - `routing` - Login, denial, root, dashboard alias and public paths
//! - `dashboards` - Role home destinations
//! - `navigation` - Per-role menus (leaves and one-level groups)
//! - `routes` - Routes that declare their own required-role list
//! - `users` - Accounts for the built-in directory
//! - `api` - HTTP server settings
//! - `logging` - Logging configuration

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod convert;
pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader, load_config, load_config_str};
pub use schema::{
    ApiConfig, AppConfig, LogFormat, LogLevel, LoggingConfig, NavEntryConfig, NavLinkConfig,
    RouteRequirement, RoutingConfig, UserConfig, VmsConfig,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
