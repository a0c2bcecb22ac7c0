// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Access-denied screen model.
//!
//! The denial screen offers exactly one way out. A signed-in principal goes
//! back to their dashboard; anyone else goes to login.

use serde::Serialize;

use crate::destination::Destination;
use crate::guard::RouteGuard;
use crate::session::SessionState;

/// The single recovery action of the denial screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "destination", rename_all = "snake_case")]
pub enum RecoveryAction {
    /// Back to the principal's dashboard.
    ReturnToDashboard(Destination),
    /// Back to the sign-in screen.
    ReturnToLogin(Destination),
}

impl RecoveryAction {
    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ReturnToDashboard(_) => "Return to Dashboard",
            Self::ReturnToLogin(_) => "Return to Login",
        }
    }

    /// Where the action navigates.
    pub fn destination(&self) -> &Destination {
        match self {
            Self::ReturnToDashboard(d) | Self::ReturnToLogin(d) => d,
        }
    }
}

/// What the denial screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialScreen {
    /// Heading.
    pub title: &'static str,
    /// Explanation.
    pub message: &'static str,
    /// The way out.
    pub recovery: RecoveryAction,
}

impl DenialScreen {
    /// Builds the screen for the current session.
    ///
    /// A principal whose role has no dashboard would be sent straight back
    /// here, so such a principal is offered login instead.
    pub fn for_session(session: &SessionState, guard: &RouteGuard) -> Self {
        let recovery = match session.principal() {
            Some(principal) => {
                let dashboard = guard.dashboard_for(principal);
                if dashboard == guard.paths().denied {
                    RecoveryAction::ReturnToLogin(guard.paths().login.clone())
                } else {
                    RecoveryAction::ReturnToDashboard(dashboard)
                }
            }
            None => RecoveryAction::ReturnToLogin(guard.paths().login.clone()),
        };

        Self {
            title: "Access Denied",
            message: "You do not have permission to view this page.",
            recovery,
        }
    }
}
