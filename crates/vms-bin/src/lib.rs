// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # vms-bin
//!
//! Command-line entry point for the VMS access layer.
//!
//! ## Usage
//!
//! ```bash
//! # Serve with built-in defaults
//! vms
//!
//! # Serve a custom configuration on another port
//! vms -c /etc/vms/vms.yaml serve --port 9090
//!
//! # Report navigation/route drift and fail on any defect
//! vms -c vms.yaml validate --strict
//!
//! # Ask the guard what happens when a manager opens /scheduled-visitors
//! vms check --role manager /scheduled-visitors
//!
//! # Print the security guard menu
//! vms menu --role security_guard
//!
//! # Produce a hash for users[].password_hash
//! vms hash-password 's3cret'
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod shutdown;

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
