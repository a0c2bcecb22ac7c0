// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Building the authorization model from configuration.
//!
//! These conversions assume a validated [`VmsConfig`] but re-check every
//! field they parse, so they never panic on a raw one.

use std::collections::BTreeSet;
use std::sync::Arc;

use vms_core::{
    ConfigDefect, DashboardResolver, DeclaredRoute, DirectoryUser, GuardPaths, NavLink,
    NavigationEntry, NavigationTable, Principal, RouteGuard, StaticUserDirectory,
};

use crate::error::ConfigResult;
use crate::schema::{NavEntryConfig, RoutingConfig, VmsConfig, parse_path, parse_role_key};

impl RoutingConfig {
    /// Builds the guard's special paths.
    pub fn guard_paths(&self) -> ConfigResult<GuardPaths> {
        let public = self
            .public_paths
            .iter()
            .enumerate()
            .map(|(i, raw)| parse_path(&format!("routing.public_paths[{i}]"), raw))
            .collect::<ConfigResult<BTreeSet<_>>>()?;

        Ok(GuardPaths {
            login: parse_path("routing.login_path", &self.login_path)?,
            denied: parse_path("routing.denied_path", &self.denied_path)?,
            root: parse_path("routing.root_path", &self.root_path)?,
            dashboard_alias: parse_path("routing.dashboard_alias", &self.dashboard_alias)?,
            public,
        })
    }
}

impl NavEntryConfig {
    fn to_entry(&self, field: &str) -> ConfigResult<NavigationEntry> {
        self.validate(field)?;
        if let Some(path) = &self.path {
            let destination = parse_path(&format!("{field}.path"), path)?;
            return Ok(NavigationEntry::leaf(&self.label, &self.icon, destination));
        }

        let children = self
            .children
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, child)| {
                let destination = parse_path(&format!("{field}.children[{i}].path"), &child.path)?;
                Ok(NavLink::new(&child.label, &child.icon, destination))
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(NavigationEntry::group(&self.label, &self.icon, children))
    }
}

impl VmsConfig {
    /// Builds the navigation table; the standard table when none is configured.
    pub fn navigation_table(&self) -> ConfigResult<NavigationTable> {
        if self.navigation.is_empty() {
            return Ok(NavigationTable::standard());
        }

        let mut builder = NavigationTable::builder();
        for (key, entries) in &self.navigation {
            let field = format!("navigation.{key}");
            let role = parse_role_key(&field, key)?;
            let entries = entries
                .iter()
                .enumerate()
                .map(|(i, entry)| entry.to_entry(&format!("{field}[{i}]")))
                .collect::<ConfigResult<Vec<_>>>()?;
            builder = builder.role(role, entries);
        }
        Ok(builder.build()?)
    }

    /// Builds the dashboard resolver; the standard dashboards when none are
    /// configured.
    pub fn dashboard_resolver(&self) -> ConfigResult<DashboardResolver> {
        let denied = parse_path("routing.denied_path", &self.routing.denied_path)?;
        if self.dashboards.is_empty() {
            return Ok(DashboardResolver::standard().with_denied(denied));
        }

        let mut resolver = DashboardResolver::new(denied);
        for (key, path) in &self.dashboards {
            let field = format!("dashboards.{key}");
            let role = parse_role_key(&field, key)?;
            resolver = resolver.with_dashboard(role, parse_path(&field, path)?);
        }
        Ok(resolver)
    }

    /// Builds the declared required-role lists.
    pub fn declared_routes(&self) -> ConfigResult<Vec<DeclaredRoute>> {
        self.routes
            .iter()
            .enumerate()
            .map(|(i, route)| {
                let field = format!("routes[{i}]");
                let destination = parse_path(&format!("{field}.path"), &route.path)?;
                let roles = route
                    .required_roles
                    .iter()
                    .enumerate()
                    .map(|(j, key)| parse_role_key(&format!("{field}.required_roles[{j}]"), key))
                    .collect::<ConfigResult<Vec<_>>>()?;
                Ok(DeclaredRoute::new(destination, roles))
            })
            .collect()
    }

    /// Builds the route guard, enforcing the declared required-role lists.
    pub fn route_guard(&self) -> ConfigResult<RouteGuard> {
        let table = Arc::new(self.navigation_table()?);
        let guard = RouteGuard::new(table, self.dashboard_resolver()?)
            .with_paths(self.routing.guard_paths()?)
            .with_declared_routes(self.declared_routes()?);
        Ok(guard)
    }

    /// Builds the user directory.
    pub fn user_directory(&self) -> ConfigResult<StaticUserDirectory> {
        let mut directory = StaticUserDirectory::new();
        for (i, user) in self.users.iter().enumerate() {
            let field = format!("users[{i}]");
            user.validate(&field)?;

            let mut principal = Principal::new(&user.name, &user.role).with_email(&user.email);
            if let Some(id) = user.id {
                principal = principal.with_id(id);
            }
            if let Some(phone) = &user.phone {
                principal = principal.with_phone(phone);
            }
            if let Some(department) = &user.department {
                principal = principal.with_department(department);
            }

            directory.insert(
                &user.email,
                DirectoryUser {
                    principal,
                    password_hash: user.password_hash.clone(),
                    active: user.active,
                },
            );
        }
        Ok(directory)
    }

    /// Runs the design-time consistency checks.
    pub fn consistency_report(&self) -> ConfigResult<Vec<ConfigDefect>> {
        let table = self.navigation_table()?;
        let dashboards = self.dashboard_resolver()?;
        let routes = self.declared_routes()?;
        Ok(vms_core::consistency::check(&table, &dashboards, &routes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NavLinkConfig, RouteRequirement};
    use vms_core::{Destination, Role, SessionState};

    fn dest(path: &str) -> Destination {
        Destination::parse(path).unwrap()
    }

    #[test]
    fn test_default_builds_standard_model() {
        let config = VmsConfig::default();
        let table = config.navigation_table().unwrap();
        assert_eq!(table.roles(), Role::ALL.to_vec());

        let guard = config.route_guard().unwrap();
        assert_eq!(guard.paths().login.as_str(), "/login");
        assert!(config.consistency_report().unwrap().is_empty());
    }

    #[test]
    fn test_custom_group_entry() {
        let entry = NavEntryConfig {
            label: "Visitors".to_string(),
            icon: "users".to_string(),
            path: None,
            children: Some(vec![NavLinkConfig {
                label: "Check In".to_string(),
                icon: "log-in".to_string(),
                path: "/check-in".to_string(),
            }]),
        };
        let built = entry.to_entry("navigation.admin[0]").unwrap();
        assert!(built.is_group());
        assert_eq!(built.children()[0].destination, dest("/check-in"));
    }

    #[test]
    fn test_custom_denied_path_reaches_dashboards() {
        let mut config = VmsConfig::default();
        config.routing.denied_path = "/forbidden".to_string();
        let resolver = config.dashboard_resolver().unwrap();
        assert_eq!(resolver.dashboard_for(Some("janitor")), dest("/forbidden"));
    }

    #[test]
    fn test_declared_route_report() {
        let mut config = VmsConfig::default();
        config.routes.push(RouteRequirement {
            path: "/scheduled-visitors".to_string(),
            required_roles: vec![
                "admin".to_string(),
                "supervisor".to_string(),
                "manager".to_string(),
            ],
        });
        let report = config.consistency_report().unwrap();
        assert_eq!(
            report,
            vec![ConfigDefect::ListedButNotNavigable {
                destination: dest("/scheduled-visitors"),
                role: Role::Manager,
            }]
        );
    }

    #[test]
    fn test_public_paths_render_without_session() {
        let mut config = VmsConfig::default();
        config.routing.public_paths = vec!["/kiosk".to_string()];
        let guard = config.route_guard().unwrap();
        assert!(guard.evaluate(&SessionState::Absent, &dest("/kiosk")).is_render());

        let signed_in = SessionState::Present(Principal::new("Uma", "user"));
        assert!(!guard.evaluate(&signed_in, &dest("/kiosk")).is_render());
    }

    #[test]
    fn test_route_guard_enforces_declared_roles() {
        let mut config = VmsConfig::default();
        config.routes.push(RouteRequirement {
            path: "/reports".to_string(),
            required_roles: vec!["admin".to_string()],
        });
        let guard = config.route_guard().unwrap();

        let admin = SessionState::Present(Principal::new("Ada", "admin"));
        let supervisor = SessionState::Present(Principal::new("Sam", "supervisor"));
        assert!(guard.evaluate(&admin, &dest("/reports")).is_render());
        assert_eq!(
            guard.evaluate(&supervisor, &dest("/reports")).redirect_target(),
            Some(&dest("/unauthorized"))
        );
    }
}
