// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `check` command.

use vms_config::VmsConfig;
use vms_core::{Destination, GuardOutcome, Principal, RedirectReason, SessionState};
use vms_web::middleware::redirect_location;

use crate::cli::{CheckArgs, OutputFormat};
use crate::error::{BinError, BinResult};

/// Evaluates the route guard for one destination and prints the outcome.
pub fn check(config: &VmsConfig, args: CheckArgs) -> BinResult<()> {
    let outcome = evaluate(config, &args)?;
    let output = match args.format {
        OutputFormat::Text => describe(&outcome),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&outcome).map_err(|e| BinError::runtime(e.to_string()))?
        }
    };
    println!("{}", output);
    Ok(())
}

fn evaluate(config: &VmsConfig, args: &CheckArgs) -> BinResult<GuardOutcome> {
    let destination = Destination::parse(&args.path)
        .map_err(|e| BinError::input(format!("'{}': {}", args.path, e)))?;
    let guard = config.route_guard()?;

    // The role is passed through unnormalized, as a session would carry it.
    let session = match (&args.role, args.anonymous) {
        (Some(role), false) => SessionState::Present(Principal::new("cli", role.as_str())),
        _ => SessionState::Absent,
    };

    Ok(guard.evaluate(&session, &destination))
}

fn describe(outcome: &GuardOutcome) -> String {
    match outcome {
        GuardOutcome::Render { destination } => format!("render {}", destination),
        GuardOutcome::RedirectTo(redirect) => format!(
            "redirect {} ({})",
            redirect_location(redirect),
            reason_label(redirect.reason)
        ),
        GuardOutcome::ShowLoading => "loading".to_string(),
    }
}

fn reason_label(reason: RedirectReason) -> &'static str {
    match reason {
        RedirectReason::Unauthenticated => "not signed in",
        RedirectReason::DashboardAlias => "dashboard alias",
        RedirectReason::AlreadyAuthenticated => "already signed in",
        RedirectReason::NotPermitted => "not in the role's navigation",
        RedirectReason::RoleNotAdmitted => "role not admitted by the route",
    }
}
