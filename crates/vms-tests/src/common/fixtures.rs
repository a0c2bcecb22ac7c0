// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Principals, accounts and configuration documents shared by the suites.

use std::sync::OnceLock;

use uuid::Uuid;
use vms_core::{DirectoryUser, Principal, Role, hash_password};

// =============================================================================
// Principal Fixtures
// =============================================================================

/// Fixture providing one principal per role.
pub struct PrincipalFixtures;

impl PrincipalFixtures {
    /// A principal with the given raw role string.
    pub fn with_role(role: &str) -> Principal {
        Principal::new(format!("Test {role}"), role)
    }

    /// An administrator.
    pub fn admin() -> Principal {
        Self::with_role("admin")
    }

    /// A supervisor.
    pub fn supervisor() -> Principal {
        Self::with_role("supervisor")
    }

    /// A manager.
    pub fn manager() -> Principal {
        Self::with_role("manager")
    }

    /// A security guard.
    pub fn security_guard() -> Principal {
        Self::with_role("security_guard")
    }

    /// An employee.
    pub fn user() -> Principal {
        Self::with_role("user")
    }

    /// A principal whose role is outside the closed set.
    pub fn unknown_role() -> Principal {
        Self::with_role("contractor")
    }

    /// One principal for every role.
    pub fn every_role() -> Vec<(Role, Principal)> {
        Role::ALL
            .into_iter()
            .map(|role| (role, Self::with_role(role.as_str())))
            .collect()
    }
}

// =============================================================================
// Account Fixtures
// =============================================================================

/// Fixture providing directory accounts.
pub struct AccountFixtures;

impl AccountFixtures {
    /// The password shared by every fixture account.
    pub const PASSWORD: &'static str = "visitor-desk-2025";

    /// Hash of [`Self::PASSWORD`], computed once per test binary.
    pub fn password_hash() -> &'static str {
        static HASH: OnceLock<String> = OnceLock::new();
        HASH.get_or_init(|| hash_password(Self::PASSWORD).expect("Failed to hash password"))
    }

    /// The sign-in email for a role's fixture account.
    pub fn email(role: Role) -> String {
        format!("{}@vms.test", role.as_str())
    }

    /// An active account for the role.
    pub fn account(role: Role) -> DirectoryUser {
        DirectoryUser {
            principal: PrincipalFixtures::with_role(role.as_str()).with_email(Self::email(role)),
            password_hash: Self::password_hash().to_string(),
            active: true,
        }
    }

    /// The email of the disabled fixture account.
    pub fn disabled_email() -> &'static str {
        "retired@vms.test"
    }

    /// A disabled account.
    pub fn disabled() -> DirectoryUser {
        DirectoryUser {
            principal: PrincipalFixtures::user().with_email(Self::disabled_email()),
            password_hash: Self::password_hash().to_string(),
            active: false,
        }
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Fixture providing configuration documents.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// Declares the legacy scheduled-visitors route that admits every role,
    /// although only admins and supervisors can navigate there.
    pub const MANAGER_DRIFT_YAML: &'static str = r#"
routes:
  - path: /scheduled-visitors
    required_roles: [admin, manager, supervisor, security_guard, user]
"#;

    /// Uses the shorthand role key that the table does not accept.
    pub const SECURITY_SHORTHAND_YAML: &'static str = r#"
dashboards:
  security: /securitydashboard
"#;

    /// A child entry that tries to nest its own children.
    pub const NESTED_GROUP_YAML: &'static str = r#"
navigation:
  admin:
    - label: Visitors
      icon: users
      children:
        - label: Inner
          icon: folder
          children:
            - label: Deep
              icon: file
              path: /deep
"#;

    /// A complete TOML document with custom routing paths.
    pub const ROUTING_TOML: &'static str = r#"
[app]
name = "Lobby"
environment = "staging"

[routing]
login_path = "/signin"
denied_path = "/forbidden"
public_paths = ["/visitor-kiosk"]

[api]
port = 9191

[logging]
level = "debug"
format = "json"
"#;

    /// A JSON document with only an api section.
    pub const API_JSON: &'static str = r#"{ "api": { "port": 8181, "session_cookie": "lobby" } }"#;

    /// A YAML document with one account per role, all using
    /// [`AccountFixtures::PASSWORD`].
    pub fn accounts_yaml() -> String {
        let mut yaml = String::from("users:\n");
        for role in Role::ALL {
            yaml.push_str(&format!(
                "  - id: {}\n    name: Test {}\n    email: {}\n    role: {}\n    password_hash: \"{}\"\n",
                Uuid::new_v4(),
                role.label(),
                AccountFixtures::email(role),
                role.as_str(),
                AccountFixtures::password_hash(),
            ));
        }
        yaml
    }
}
