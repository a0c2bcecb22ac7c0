// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Design-time consistency checks.
//!
//! Finds drift between the navigation table, the dashboard map and any
//! route that still declares its own required-role list. The guard enforces
//! both the table and the declared lists; these defects flag configurations
//! where the two disagree and the result would surprise whoever wrote them.

use std::fmt;

use serde::Serialize;

use crate::dashboard::DashboardResolver;
use crate::destination::Destination;
use crate::navigation::NavigationTable;
use crate::role::Role;

/// A route with an explicitly declared required-role list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredRoute {
    /// Route destination.
    pub destination: Destination,
    /// Roles the route declares it admits.
    pub required_roles: Vec<Role>,
}

impl DeclaredRoute {
    /// Creates a declared route.
    pub fn new(destination: Destination, required_roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            destination,
            required_roles: required_roles.into_iter().collect(),
        }
    }
}

/// A configuration defect.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigDefect {
    /// The role has no navigation entries, so it can reach nothing.
    MissingRole {
        /// Role.
        role: Role,
    },
    /// The role's dashboard is outside its allowed set.
    UnreachableDashboard {
        /// Role.
        role: Role,
        /// Its dashboard.
        dashboard: Destination,
    },
    /// A declared route admits the role but the table does not.
    ListedButNotNavigable {
        /// Route destination.
        destination: Destination,
        /// Role.
        role: Role,
    },
    /// The table admits the role but the declared route does not.
    NavigableButNotListed {
        /// Route destination.
        destination: Destination,
        /// Role.
        role: Role,
    },
}

impl fmt::Display for ConfigDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRole { role } => {
                write!(f, "role '{role}' has no navigation entries")
            }
            Self::UnreachableDashboard { role, dashboard } => write!(
                f,
                "dashboard '{dashboard}' of role '{role}' is not in its navigation; \
                 the dashboard redirect would be denied"
            ),
            Self::ListedButNotNavigable { destination, role } => write!(
                f,
                "route '{destination}' lists role '{role}' but its navigation does not include it; \
                 the guard denies it"
            ),
            Self::NavigableButNotListed { destination, role } => write!(
                f,
                "role '{role}' can navigate to '{destination}' but the route does not list it"
            ),
        }
    }
}

/// Runs every check and returns the defects, sorted.
pub fn check(
    table: &NavigationTable,
    dashboards: &DashboardResolver,
    routes: &[DeclaredRoute],
) -> Vec<ConfigDefect> {
    let mut defects = Vec::new();

    for role in Role::ALL {
        let allowed = table.resolve_allowed(role.as_str());
        if allowed.is_empty() {
            defects.push(ConfigDefect::MissingRole { role });
            continue;
        }
        if dashboards.has_dashboard(role) {
            let dashboard = dashboards.dashboard_for_role(role);
            if !allowed.contains(&dashboard) {
                defects.push(ConfigDefect::UnreachableDashboard { role, dashboard });
            }
        }
    }

    for route in routes {
        let navigable = table.roles_for(&route.destination);
        for role in &route.required_roles {
            if !navigable.contains(role) {
                defects.push(ConfigDefect::ListedButNotNavigable {
                    destination: route.destination.clone(),
                    role: *role,
                });
            }
        }
        for role in navigable {
            if !route.required_roles.contains(&role) {
                defects.push(ConfigDefect::NavigableButNotListed {
                    destination: route.destination.clone(),
                    role,
                });
            }
        }
    }

    defects.sort();
    defects.dedup();
    defects
}
