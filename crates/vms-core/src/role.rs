// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Principal roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;

// =============================================================================
// Role
// =============================================================================

/// The closed set of principal classes.
///
/// Role keys are lower-case with underscores. `security_guard` is the only
/// spelling of the guard role; the shorthand `security` is not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administration, including user management.
    Admin,
    /// Oversees front-desk operations and shift reports.
    Supervisor,
    /// Read-mostly access to visitor logs and reports.
    Manager,
    /// Front-desk guard handling check-in and check-out.
    SecurityGuard,
    /// Employee hosting visitors.
    User,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Supervisor,
        Role::Manager,
        Role::SecurityGuard,
        Role::User,
    ];

    /// Returns the canonical role key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Manager => "manager",
            Role::SecurityGuard => "security_guard",
            Role::User => "user",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Supervisor => "Supervisor",
            Role::Manager => "Manager",
            Role::SecurityGuard => "Security Guard",
            Role::User => "User",
        }
    }

    /// Matches an already-normalized key exactly.
    ///
    /// Matching is case-sensitive; use [`Role::parse`] for raw input.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "admin" => Some(Role::Admin),
            "supervisor" => Some(Role::Supervisor),
            "manager" => Some(Role::Manager),
            "security_guard" => Some(Role::SecurityGuard),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Normalizes raw input and matches it against the canonical keys.
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_key(&normalize_role_key(s))
    }

    /// Returns the home destination for this role.
    pub fn default_dashboard(&self) -> &'static str {
        match self {
            Role::Admin => "/admindashboard",
            Role::Supervisor => "/supervisordashboard",
            Role::Manager => "/managerdashboard",
            Role::SecurityGuard => "/securitydashboard",
            Role::User => "/userdashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AccessError::unknown_role(s))
    }
}

/// Lower-cases and trims a raw role string.
///
/// Callers normalize before consulting the navigation table or the dashboard
/// resolver; both match keys case-sensitively.
pub fn normalize_role_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// =============================================================================
// Tests
// =============================================================================
