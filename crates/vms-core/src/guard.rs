// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route guard.
//!
//! The guard is the one enforcement point for navigation. It is a pure
//! function of the session state, the requested destination and the
//! navigation table, evaluated on every navigation attempt and on every
//! session transition.
//!
//! # Evaluation order
//!
//! 1. `Loading` shows the loading indicator.
//! 2. `Absent` redirects to login, remembering the requested destination.
//!    Login and the configured public paths render instead.
//! 3. `Present`:
//!    - root or dashboard alias redirects to the role dashboard;
//!    - login redirects to the role dashboard;
//!    - the denial page renders;
//!    - a declared required-role list that excludes the role denies
//!      (lists come from [`RouteGuard::with_declared_routes`] or
//!      [`RouteGuard::evaluate_with_roles`]);
//!    - a destination in the role's allowed set renders;
//!    - anything else denies.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;

use crate::consistency::DeclaredRoute;
use crate::dashboard::DashboardResolver;
use crate::destination::{DASHBOARD_ALIAS_PATH, DENIED_PATH, Destination, LOGIN_PATH};
use crate::navigation::NavigationTable;
use crate::resolver::AllowedSet;
use crate::role::Role;
use crate::session::{Principal, SessionState};

// =============================================================================
// GuardPaths
// =============================================================================

/// The special destinations the guard redirects between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPaths {
    /// Sign-in screen; always public.
    pub login: Destination,
    /// Access-denied screen.
    pub denied: Destination,
    /// Generic root, redirected to the role dashboard.
    pub root: Destination,
    /// Generic dashboard alias, redirected to the role dashboard.
    pub dashboard_alias: Destination,
    /// Extra destinations that render without a session. A signed-in
    /// principal still needs them in its allowed set.
    pub public: BTreeSet<Destination>,
}

impl GuardPaths {
    /// Returns `true` if the destination renders for an absent session.
    pub fn is_public(&self, destination: &Destination) -> bool {
        *destination == self.login || self.public.contains(destination)
    }

    /// Returns `true` for the root and the dashboard alias.
    pub fn is_home_alias(&self, destination: &Destination) -> bool {
        *destination == self.root || *destination == self.dashboard_alias
    }
}

impl Default for GuardPaths {
    fn default() -> Self {
        Self {
            login: Destination::from_static(LOGIN_PATH),
            denied: Destination::from_static(DENIED_PATH),
            root: Destination::root(),
            dashboard_alias: Destination::from_static(DASHBOARD_ALIAS_PATH),
            public: BTreeSet::new(),
        }
    }
}

// =============================================================================
// GuardOutcome
// =============================================================================

/// Why the guard redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    /// No session.
    Unauthenticated,
    /// Root or dashboard alias resolved to the role dashboard.
    DashboardAlias,
    /// A signed-in principal asked for the login screen.
    AlreadyAuthenticated,
    /// The destination is outside the role's allowed set.
    NotPermitted,
    /// The route's required-role list excludes the role.
    RoleNotAdmitted,
}

impl RedirectReason {
    /// Returns `true` for the denial reasons.
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::NotPermitted | Self::RoleNotAdmitted)
    }
}

/// A redirect decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    /// Where to go.
    pub destination: Destination,
    /// The originally requested destination, kept for retry after sign-in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_to: Option<Destination>,
    /// Why.
    pub reason: RedirectReason,
}

/// The renderer-facing result of one guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardOutcome {
    /// Render the destination.
    Render {
        /// The destination to render.
        destination: Destination,
    },
    /// Navigate elsewhere.
    RedirectTo(Redirect),
    /// Show the loading indicator; re-evaluate once the session resolves.
    ShowLoading,
}

impl GuardOutcome {
    fn render(destination: &Destination) -> Self {
        Self::Render {
            destination: destination.clone(),
        }
    }

    fn redirect(destination: Destination, reason: RedirectReason) -> Self {
        Self::RedirectTo(Redirect {
            destination,
            return_to: None,
            reason,
        })
    }

    /// Returns `true` for [`GuardOutcome::Render`].
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }

    /// Returns the redirect, if any.
    pub fn as_redirect(&self) -> Option<&Redirect> {
        match self {
            Self::RedirectTo(redirect) => Some(redirect),
            _ => None,
        }
    }

    /// Returns the redirect target, if any.
    pub fn redirect_target(&self) -> Option<&Destination> {
        self.as_redirect().map(|r| &r.destination)
    }
}

// =============================================================================
// RouteGuard
// =============================================================================

/// The navigation enforcement point.
///
/// Cheap to clone; the table is shared.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    table: Arc<NavigationTable>,
    dashboards: DashboardResolver,
    paths: GuardPaths,
    declared: Arc<BTreeMap<Destination, Vec<Role>>>,
}

impl RouteGuard {
    /// Creates a guard with default paths.
    ///
    /// The dashboard resolver falls through to the guard's denial path.
    pub fn new(table: Arc<NavigationTable>, dashboards: DashboardResolver) -> Self {
        let paths = GuardPaths::default();
        Self {
            table,
            dashboards: dashboards.with_denied(paths.denied.clone()),
            paths,
            declared: Arc::new(BTreeMap::new()),
        }
    }

    /// The guard over the standard table and dashboards.
    pub fn standard() -> Self {
        Self::new(Arc::new(NavigationTable::standard()), DashboardResolver::standard())
    }

    /// Replaces the special paths.
    pub fn with_paths(mut self, paths: GuardPaths) -> Self {
        self.dashboards = self.dashboards.with_denied(paths.denied.clone());
        self.paths = paths;
        self
    }

    /// Enforces declared required-role lists on their destinations.
    ///
    /// A later route for the same destination replaces an earlier one.
    pub fn with_declared_routes(mut self, routes: impl IntoIterator<Item = DeclaredRoute>) -> Self {
        let declared = routes
            .into_iter()
            .map(|route| (route.destination, route.required_roles))
            .collect();
        self.declared = Arc::new(declared);
        self
    }

    /// Returns the navigation table.
    pub fn table(&self) -> &Arc<NavigationTable> {
        &self.table
    }

    /// Returns the dashboard resolver.
    pub fn dashboards(&self) -> &DashboardResolver {
        &self.dashboards
    }

    /// Returns the special paths.
    pub fn paths(&self) -> &GuardPaths {
        &self.paths
    }

    /// Returns the allowed set for a principal.
    pub fn allowed_for(&self, principal: &Principal) -> AllowedSet {
        self.table.resolve_allowed(&principal.role_key())
    }

    /// Returns the dashboard for a principal.
    pub fn dashboard_for(&self, principal: &Principal) -> Destination {
        self.dashboards.dashboard_for(Some(&principal.role_key()))
    }

    /// Returns the declared required-role list of a destination, if any.
    pub fn declared_roles(&self, destination: &Destination) -> Option<&[Role]> {
        self.declared.get(destination).map(Vec::as_slice)
    }

    /// Evaluates a navigation attempt, applying the destination's declared
    /// required-role list when it has one.
    pub fn evaluate(&self, session: &SessionState, destination: &Destination) -> GuardOutcome {
        match self.declared_roles(destination) {
            Some(required) => self.evaluate_with_roles(session, destination, required),
            None => self.evaluate_inner(session, destination, None),
        }
    }

    /// Evaluates a navigation attempt against a route that declares its own
    /// required-role list.
    ///
    /// The list is checked first; the allowed set must still admit the
    /// destination.
    pub fn evaluate_with_roles(
        &self,
        session: &SessionState,
        destination: &Destination,
        required_roles: &[Role],
    ) -> GuardOutcome {
        self.evaluate_inner(session, destination, Some(required_roles))
    }

    fn evaluate_inner(
        &self,
        session: &SessionState,
        destination: &Destination,
        required_roles: Option<&[Role]>,
    ) -> GuardOutcome {
        let principal = match session {
            SessionState::Loading => return GuardOutcome::ShowLoading,
            SessionState::Absent => {
                if self.paths.is_public(destination) {
                    return GuardOutcome::render(destination);
                }
                tracing::info!(destination = %destination, "No session, redirecting to login");
                return GuardOutcome::RedirectTo(Redirect {
                    destination: self.paths.login.clone(),
                    return_to: Some(destination.clone()),
                    reason: RedirectReason::Unauthenticated,
                });
            }
            SessionState::Present(principal) => principal,
        };

        let role_key = principal.role_key();

        if self.paths.is_home_alias(destination) {
            let dashboard = self.dashboards.dashboard_for(Some(&role_key));
            tracing::debug!(
                principal_id = %principal.id,
                role = %role_key,
                dashboard = %dashboard,
                "Resolved dashboard alias"
            );
            return GuardOutcome::redirect(dashboard, RedirectReason::DashboardAlias);
        }

        if *destination == self.paths.login {
            let dashboard = self.dashboards.dashboard_for(Some(&role_key));
            return GuardOutcome::redirect(dashboard, RedirectReason::AlreadyAuthenticated);
        }

        if *destination == self.paths.denied {
            return GuardOutcome::render(destination);
        }

        if let Some(required) = required_roles {
            let admitted = Role::from_key(&role_key).is_some_and(|role| required.contains(&role));
            if !admitted {
                tracing::warn!(
                    principal_id = %principal.id,
                    role = %role_key,
                    destination = %destination,
                    required_roles = ?required,
                    "Role not admitted by route"
                );
                return GuardOutcome::redirect(
                    self.paths.denied.clone(),
                    RedirectReason::RoleNotAdmitted,
                );
            }
        }

        if self.table.resolve_allowed(&role_key).contains(destination) {
            tracing::debug!(
                principal_id = %principal.id,
                role = %role_key,
                destination = %destination,
                "Rendering destination"
            );
            GuardOutcome::render(destination)
        } else {
            tracing::warn!(
                principal_id = %principal.id,
                role = %role_key,
                destination = %destination,
                "Destination not permitted"
            );
            GuardOutcome::redirect(self.paths.denied.clone(), RedirectReason::NotPermitted)
        }
    }

    /// Picks where a freshly signed-in principal lands.
    ///
    /// The preserved destination wins when the principal may render it;
    /// otherwise the principal's dashboard.
    pub fn post_login_destination(
        &self,
        principal: &Principal,
        return_to: Option<&Destination>,
    ) -> Destination {
        let session = SessionState::Present(principal.clone());
        return_to
            .filter(|d| **d != self.paths.denied)
            .filter(|d| self.evaluate(&session, d).is_render())
            .cloned()
            .unwrap_or_else(|| self.dashboard_for(principal))
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(path: &str) -> Destination {
        Destination::parse(path).unwrap()
    }

    fn present(role: &str) -> SessionState {
        SessionState::Present(Principal::new("Test", role))
    }

    #[test]
    fn test_loading_shows_indicator() {
        let guard = RouteGuard::standard();
        assert_eq!(
            guard.evaluate(&SessionState::Loading, &dest("/check-in")),
            GuardOutcome::ShowLoading
        );
    }

    #[test]
    fn test_absent_redirects_to_login_with_return() {
        let guard = RouteGuard::standard();
        let outcome = guard.evaluate(&SessionState::Absent, &dest("/check-in"));
        let redirect = outcome.as_redirect().unwrap();
        assert_eq!(redirect.destination.as_str(), LOGIN_PATH);
        assert_eq!(redirect.return_to, Some(dest("/check-in")));
        assert_eq!(redirect.reason, RedirectReason::Unauthenticated);
    }

    #[test]
    fn test_absent_may_see_login() {
        let guard = RouteGuard::standard();
        assert!(guard.evaluate(&SessionState::Absent, &dest("/login")).is_render());
        assert!(!guard.evaluate(&SessionState::Absent, &dest(DENIED_PATH)).is_render());
    }

    #[test]
    fn test_alias_redirects_to_dashboard() {
        let guard = RouteGuard::standard();
        for path in ["/", "/dashboard"] {
            let outcome = guard.evaluate(&present("user"), &dest(path));
            assert_eq!(outcome.redirect_target().unwrap().as_str(), "/userdashboard");
        }
    }

    #[test]
    fn test_allowed_and_denied() {
        let guard = RouteGuard::standard();
        assert!(guard.evaluate(&present("admin"), &dest("/user-management")).is_render());

        let outcome = guard.evaluate(&present("security_guard"), &dest("/user-management"));
        let redirect = outcome.as_redirect().unwrap();
        assert_eq!(redirect.destination.as_str(), DENIED_PATH);
        assert_eq!(redirect.reason, RedirectReason::NotPermitted);
    }

    #[test]
    fn test_raw_role_is_normalized() {
        let guard = RouteGuard::standard();
        assert!(guard.evaluate(&present(" ADMIN "), &dest("/settings")).is_render());
    }

    #[test]
    fn test_unknown_role_denied_everywhere() {
        let guard = RouteGuard::standard();
        let session = present("security");
        assert_eq!(
            guard.evaluate(&session, &dest("/check-in")).redirect_target(),
            Some(&dest(DENIED_PATH))
        );
        assert_eq!(
            guard.evaluate(&session, &dest("/")).redirect_target(),
            Some(&dest(DENIED_PATH))
        );
        assert!(guard.evaluate(&session, &dest(DENIED_PATH)).is_render());
    }

    #[test]
    fn test_required_roles_checked_before_allowed_set() {
        let guard = RouteGuard::standard();
        let outcome =
            guard.evaluate_with_roles(&present("admin"), &dest("/check-in"), &[Role::SecurityGuard]);
        assert_eq!(
            outcome.as_redirect().map(|r| r.reason),
            Some(RedirectReason::RoleNotAdmitted)
        );

        let outcome = guard.evaluate_with_roles(
            &present("manager"),
            &dest("/scheduled-visitors"),
            &[Role::Admin, Role::Supervisor, Role::Manager],
        );
        assert_eq!(
            outcome.as_redirect().map(|r| r.reason),
            Some(RedirectReason::NotPermitted)
        );
    }

    #[test]
    fn test_declared_routes_apply_on_evaluate() {
        let guard = RouteGuard::standard()
            .with_declared_routes([DeclaredRoute::new(dest("/reports"), [Role::Admin])]);
        assert_eq!(guard.declared_roles(&dest("/reports")), Some(&[Role::Admin][..]));
        assert!(guard.declared_roles(&dest("/settings")).is_none());

        assert!(guard.evaluate(&present("admin"), &dest("/reports")).is_render());
        let outcome = guard.evaluate(&present("supervisor"), &dest("/reports"));
        let redirect = outcome.as_redirect().unwrap();
        assert_eq!(redirect.destination.as_str(), DENIED_PATH);
        assert_eq!(redirect.reason, RedirectReason::RoleNotAdmitted);
    }

    #[test]
    fn test_signed_in_login_goes_home() {
        let guard = RouteGuard::standard();
        let outcome = guard.evaluate(&present("manager"), &dest("/login"));
        let redirect = outcome.as_redirect().unwrap();
        assert_eq!(redirect.destination.as_str(), "/managerdashboard");
        assert_eq!(redirect.reason, RedirectReason::AlreadyAuthenticated);
    }

    #[test]
    fn test_post_login_destination() {
        let guard = RouteGuard::standard();
        let guard_user = Principal::new("G", "security_guard");

        let check_in = dest("/check-in");
        assert_eq!(guard.post_login_destination(&guard_user, Some(&check_in)), check_in);
        assert_eq!(
            guard
                .post_login_destination(&guard_user, Some(&dest("/user-management")))
                .as_str(),
            "/securitydashboard"
        );
        assert_eq!(
            guard.post_login_destination(&guard_user, None).as_str(),
            "/securitydashboard"
        );
    }

    #[test]
    fn test_custom_paths() {
        let paths = GuardPaths {
            login: dest("/signin"),
            denied: dest("/forbidden"),
            public: [dest("/visitor-kiosk")].into_iter().collect(),
            ..GuardPaths::default()
        };
        let guard = RouteGuard::standard().with_paths(paths);

        assert!(guard.evaluate(&SessionState::Absent, &dest("/visitor-kiosk")).is_render());
        assert_eq!(
            guard.evaluate(&present("user"), &dest("/visitor-kiosk")).redirect_target(),
            Some(&dest("/forbidden"))
        );
        assert_eq!(
            guard.evaluate(&SessionState::Absent, &dest("/reports")).redirect_target(),
            Some(&dest("/signin"))
        );
        assert_eq!(
            guard.evaluate(&present("nobody"), &dest("/dashboard")).redirect_target(),
            Some(&dest("/forbidden"))
        );
    }
}
