// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Common Test Utilities
//!
//! - `fixtures`: pre-built principals, accounts and configuration documents
//! - `builders`: builders for application state and HTTP requests
//! - `assertions`: assertion helpers with descriptive failure messages

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;

use std::io::Write;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize test logging. Call this at the start of a test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("warn,vms_core=debug,vms_web=debug")),
            )
            .with_test_writer()
            .init();
    });
}

/// Writes `content` to a temporary file with the given extension.
///
/// The file is removed when the handle drops.
pub fn temp_config_file(content: &str, extension: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("vms-config-")
        .suffix(&format!(".{extension}"))
        .tempfile()
        .expect("Failed to create temp config file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp config file");
    file
}
