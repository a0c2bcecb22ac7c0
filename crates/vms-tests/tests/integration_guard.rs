// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Route Guard Integration Tests
//!
//! End-to-end checks of the access model: navigation table, resolver,
//! dashboards, guard and denial screen together.
//!
//! ## Test Categories
//!
//! - `test_menu_*`: menu and allowed-set agreement
//! - `test_scenario_*`: acceptance scenarios
//! - `test_guard_*`: guard properties
//! - `test_session_*`: session store driving the guard
//! - `test_denial_*`: denial screen

use std::sync::Arc;

use vms_core::{
    Credentials, DashboardResolver, DenialScreen, Destination, GuardOutcome, NavigationEntry,
    NavigationTable, RecoveryAction, RedirectReason, Role, RouteGuard, SessionState, SessionStore,
    InMemorySessionStore, StaticUserDirectory, flatten, resolve_allowed,
};
use vms_tests::prelude::*;

fn dest(path: &str) -> Destination {
    Destination::parse(path).expect("valid destination")
}

fn present(principal: vms_core::Principal) -> SessionState {
    SessionState::Present(principal)
}

// =============================================================================
// Menu / Allowed-Set Agreement
// =============================================================================

#[test]
fn test_menu_and_allowed_set_share_entries() {
    let table = NavigationTable::standard();

    for role in Role::ALL {
        let menu = table.menu_for(role.as_str());
        let from_menu: Vec<_> = menu.iter().flat_map(NavigationEntry::destinations).collect();
        let allowed = resolve_allowed(&table, role.as_str());

        assert_eq!(allowed, flatten(menu), "menu and resolver disagree for {role}");
        for destination in from_menu {
            assert!(
                allowed.contains(destination),
                "{role}: menu item {destination} is not allowed"
            );
        }
    }
}

#[test]
fn test_menu_groups_contribute_only_children() {
    let table = NavigationTable::standard();
    for role in Role::ALL {
        for entry in table.menu_for(role.as_str()) {
            if entry.is_group() {
                assert!(entry.destination().is_none());
                assert!(!entry.children().is_empty());
            }
        }
    }
}

#[test]
fn test_menu_unknown_role_is_empty() {
    let guard = RouteGuard::standard();
    let stranger = PrincipalFixtures::unknown_role();

    assert!(guard.allowed_for(&stranger).is_empty());
    assert_eq!(guard.dashboard_for(&stranger), guard.paths().denied);
    assert!(guard.table().menu_for("security").is_empty());
}

// =============================================================================
// Acceptance Scenarios
// =============================================================================

#[test]
fn test_scenario_admin_user_management_renders() {
    init_test_logging();
    let guard = RouteGuard::standard();
    guard
        .evaluate(&present(PrincipalFixtures::admin()), &dest("/user-management"))
        .assert_renders("/user-management");
}

#[test]
fn test_scenario_security_guard_user_management_denied() {
    let guard = RouteGuard::standard();
    guard
        .evaluate(
            &present(PrincipalFixtures::security_guard()),
            &dest("/user-management"),
        )
        .assert_redirect_reason("/unauthorized", RedirectReason::NotPermitted);
}

#[test]
fn test_scenario_no_session_preserves_destination() {
    let guard = RouteGuard::standard();
    let outcome = guard.evaluate(&SessionState::Absent, &dest("/check-in"));

    outcome.assert_redirect_reason("/login", RedirectReason::Unauthenticated);
    let redirect = outcome.as_redirect().expect("redirect");
    assert_eq!(redirect.return_to, Some(dest("/check-in")));
}

#[test]
fn test_scenario_user_dashboard_alias() {
    let guard = RouteGuard::standard();
    guard
        .evaluate(&present(PrincipalFixtures::user()), &dest("/dashboard"))
        .assert_redirect_reason("/userdashboard", RedirectReason::DashboardAlias);
}

#[test]
fn test_scenario_manager_scheduled_visitors_denied_and_reported() {
    let config = vms_config::load_config_str(
        ConfigFixtures::MANAGER_DRIFT_YAML,
        vms_config::ConfigFormat::Yaml,
    )
    .expect("drift config loads");
    let guard = config.route_guard().expect("guard");
    let manager = present(PrincipalFixtures::manager());
    let scheduled = dest("/scheduled-visitors");

    guard
        .evaluate(&manager, &scheduled)
        .assert_redirect_reason("/unauthorized", RedirectReason::NotPermitted);

    // The declared list names the manager, but the table still wins.
    let declared = [
        Role::Admin,
        Role::Manager,
        Role::Supervisor,
        Role::SecurityGuard,
        Role::User,
    ];
    guard
        .evaluate_with_roles(&manager, &scheduled, &declared)
        .assert_redirects_to("/unauthorized");

    let defects = config.consistency_report().expect("report");
    assert!(defects.iter().any(|defect| matches!(
        defect,
        vms_core::ConfigDefect::ListedButNotNavigable { destination, role }
            if destination == &scheduled && *role == Role::Manager
    )));
}

// =============================================================================
// Guard Properties
// =============================================================================

#[test]
fn test_guard_absent_session_never_renders_protected() {
    let guard = RouteGuard::standard();
    for (_, principal) in PrincipalFixtures::every_role() {
        for destination in guard.allowed_for(&principal).iter() {
            guard
                .evaluate(&SessionState::Absent, destination)
                .assert_redirects_to("/login");
        }
    }
}

#[test]
fn test_guard_root_and_alias_agree() {
    let guard = RouteGuard::standard();
    for (role, principal) in PrincipalFixtures::every_role() {
        let session = present(principal);
        let root = guard.evaluate(&session, &dest("/"));
        let alias = guard.evaluate(&session, &dest("/dashboard"));
        assert_eq!(root, alias);
        root.assert_redirects_to(role.default_dashboard());
    }
}

#[test]
fn test_guard_dashboards_are_reachable() {
    let guard = RouteGuard::standard();
    for (role, principal) in PrincipalFixtures::every_role() {
        guard
            .evaluate(&present(principal), &dest(role.default_dashboard()))
            .assert_renders(role.default_dashboard());
    }
}

#[test]
fn test_guard_is_idempotent() {
    let guard = RouteGuard::standard();
    let session = present(PrincipalFixtures::supervisor());
    for path in ["/check-in", "/settings", "/", "/login", "/unauthorized"] {
        let first = guard.evaluate(&session, &dest(path));
        let second = guard.evaluate(&session, &dest(path));
        assert_eq!(first, second, "evaluation of {path} changed");
    }
}

#[test]
fn test_guard_unknown_role_denied_everywhere() {
    let guard = RouteGuard::standard();
    let session = present(PrincipalFixtures::unknown_role());

    guard
        .evaluate(&session, &dest("/check-in"))
        .assert_redirects_to("/unauthorized");
    guard
        .evaluate(&session, &dest("/dashboard"))
        .assert_redirects_to("/unauthorized");
    guard
        .evaluate(&session, &dest("/unauthorized"))
        .assert_renders("/unauthorized");
}

#[test]
fn test_guard_role_is_normalized() {
    let guard = RouteGuard::standard();
    let session = present(PrincipalFixtures::with_role("  Security_Guard "));
    guard
        .evaluate(&session, &dest("/check-in"))
        .assert_renders("/check-in");
}

#[test]
fn test_guard_loading_shows_indicator() {
    let guard = RouteGuard::standard();
    for path in ["/", "/login", "/check-in", "/unauthorized"] {
        guard.evaluate(&SessionState::Loading, &dest(path)).assert_loading();
    }
}

#[test]
fn test_guard_post_login_destination() {
    let guard = RouteGuard::standard();
    let security = PrincipalFixtures::security_guard();

    assert_eq!(
        guard.post_login_destination(&security, Some(&dest("/check-in"))),
        dest("/check-in")
    );
    assert_eq!(
        guard.post_login_destination(&security, Some(&dest("/settings"))),
        dest("/securitydashboard")
    );
    assert_eq!(
        guard.post_login_destination(&security, None),
        dest("/securitydashboard")
    );
}

#[test]
fn test_guard_custom_dashboard_outside_table() {
    let dashboards = DashboardResolver::standard().with_dashboard(Role::User, dest("/home"));
    let guard = RouteGuard::new(Arc::new(NavigationTable::standard()), dashboards);
    let session = present(PrincipalFixtures::user());

    let outcome = guard.evaluate(&session, &dest("/dashboard"));
    outcome.assert_redirects_to("/home");
    guard
        .evaluate(&session, &dest("/home"))
        .assert_redirects_to("/unauthorized");
}

// =============================================================================
// Session Store Driving the Guard
// =============================================================================

#[tokio::test]
async fn test_session_store_lifecycle() {
    init_test_logging();
    let directory = StaticUserDirectory::new()
        .with_user(
            &AccountFixtures::email(Role::SecurityGuard),
            AccountFixtures::account(Role::SecurityGuard),
        );
    let store = InMemorySessionStore::new(Arc::new(directory));
    let guard = RouteGuard::standard();
    let check_in = dest("/check-in");

    guard.evaluate(&store.state(), &check_in).assert_loading();

    let credentials = Credentials::new(
        AccountFixtures::email(Role::SecurityGuard),
        AccountFixtures::PASSWORD,
    );
    let principal = store.sign_in(&credentials).await.expect("sign in");
    assert_eq!(principal.role, "security_guard");
    guard.evaluate(&store.state(), &check_in).assert_renders("/check-in");

    store.sign_out().await;
    assert!(store.current_principal().is_none());
    guard
        .evaluate(&store.state(), &check_in)
        .assert_redirects_to("/login");
}

#[tokio::test]
async fn test_session_failed_sign_in_resolves_to_absent() {
    let store = InMemorySessionStore::new(Arc::new(StaticUserDirectory::new()));
    let result = store
        .sign_in(&Credentials::new("nobody@vms.test", "nope"))
        .await;

    assert!(result.is_err());
    assert!(!store.is_loading());
    assert_eq!(store.state(), SessionState::Absent);
}

// =============================================================================
// Denial Screen
// =============================================================================

#[test]
fn test_denial_recovery_depends_on_session() {
    let guard = RouteGuard::standard();

    let signed_in = DenialScreen::for_session(&present(PrincipalFixtures::manager()), &guard);
    assert_eq!(
        signed_in.recovery,
        RecoveryAction::ReturnToDashboard(dest("/managerdashboard"))
    );

    let signed_out = DenialScreen::for_session(&SessionState::Absent, &guard);
    assert_eq!(signed_out.recovery, RecoveryAction::ReturnToLogin(dest("/login")));
}

#[test]
fn test_denial_unknown_role_returns_to_login() {
    let guard = RouteGuard::standard();
    let screen = DenialScreen::for_session(&present(PrincipalFixtures::unknown_role()), &guard);
    assert_eq!(screen.recovery.destination(), &dest("/login"));
}

#[test]
fn test_denial_outcome_serializes_for_renderer() {
    let guard = RouteGuard::standard();
    let outcome = guard.evaluate(&present(PrincipalFixtures::user()), &dest("/settings"));
    assert!(matches!(outcome, GuardOutcome::RedirectTo(_)));

    let json = serde_json::to_value(&outcome).expect("serialize");
    assert_eq!(json["outcome"], "redirect_to");
    assert_eq!(json["destination"], "/unauthorized");
    assert_eq!(json["reason"], "not_permitted");
}
