// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `serve` command.

use tracing::{info, warn};
use vms_config::VmsConfig;
use vms_web::{AppState, WebServer};

use crate::cli::ServeArgs;
use crate::error::{BinError, BinResult};
use crate::shutdown::shutdown_signal;

/// Runs the web server until Ctrl-C or SIGTERM.
pub async fn serve(mut config: VmsConfig, args: ServeArgs) -> BinResult<()> {
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(bind) = args.bind {
        config.api.bind_address = bind;
    }

    if !config.api.enabled {
        return Err(BinError::config("the api section is disabled; nothing to serve"));
    }

    info!(
        app = %config.app.name,
        environment = %config.app.environment,
        "Starting VMS v{}",
        vms_core::VERSION
    );

    // Drift does not stop the server; `validate --strict` is the gate for that.
    for defect in config.consistency_report()? {
        warn!(%defect, "Configuration drift");
    }

    let state = AppState::from_config(&config)?;
    WebServer::new(state)
        .run_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| BinError::from(e).with_context("web server"))?;

    info!("VMS shutdown complete");
    Ok(())
}
