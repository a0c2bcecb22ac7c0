// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role dashboards.

use std::collections::HashMap;

use crate::destination::{DENIED_PATH, Destination};
use crate::role::Role;

/// Maps a role to its home destination.
///
/// Total: unknown and absent roles map to the denial destination.
#[derive(Debug, Clone)]
pub struct DashboardResolver {
    dashboards: HashMap<Role, Destination>,
    denied: Destination,
}

impl DashboardResolver {
    /// Creates a resolver with no dashboards; every lookup falls through.
    pub fn new(denied: Destination) -> Self {
        Self {
            dashboards: HashMap::new(),
            denied,
        }
    }

    /// The default dashboard for every role.
    pub fn standard() -> Self {
        let dashboards = Role::ALL
            .into_iter()
            .map(|role| (role, Destination::from_static(role.default_dashboard())))
            .collect();
        Self {
            dashboards,
            denied: Destination::from_static(DENIED_PATH),
        }
    }

    /// Sets the dashboard of a role.
    pub fn with_dashboard(mut self, role: Role, destination: Destination) -> Self {
        self.dashboards.insert(role, destination);
        self
    }

    /// Sets the fall-through destination.
    pub fn with_denied(mut self, denied: Destination) -> Self {
        self.denied = denied;
        self
    }

    /// Returns the dashboard for a normalized role key.
    pub fn dashboard_for(&self, role: Option<&str>) -> Destination {
        role.and_then(Role::from_key)
            .map(|role| self.dashboard_for_role(role))
            .unwrap_or_else(|| self.denied.clone())
    }

    /// Returns the dashboard for a role.
    pub fn dashboard_for_role(&self, role: Role) -> Destination {
        self.dashboards
            .get(&role)
            .cloned()
            .unwrap_or_else(|| self.denied.clone())
    }

    /// Returns `true` if the role has its own dashboard.
    pub fn has_dashboard(&self, role: Role) -> bool {
        self.dashboards.contains_key(&role)
    }

    /// Returns the fall-through destination.
    pub fn denied(&self) -> &Destination {
        &self.denied
    }
}

impl Default for DashboardResolver {
    fn default() -> Self {
        Self::standard()
    }
}
