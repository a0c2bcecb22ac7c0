// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for VMS.
//!
//! # Schema Structure
//!
//! ```text
//! VmsConfig
//! ├── app: AppConfig
//! ├── routing: RoutingConfig
//! ├── dashboards: role → path
//! ├── navigation: role → [NavEntryConfig]
//! ├── routes: [RouteRequirement]
//! ├── users: [UserConfig]
//! ├── api: ApiConfig
//! └── logging: LoggingConfig
//! ```
//!
//! Every section has a default, so an empty file is a valid configuration
//! that serves the standard navigation table.

use std::collections::{BTreeMap, HashSet};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vms_core::{DASHBOARD_ALIAS_PATH, DENIED_PATH, Destination, LOGIN_PATH, ROOT_PATH, Role};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default API port.
pub const DEFAULT_API_PORT: u16 = 8080;

/// Default session cookie name.
pub const DEFAULT_SESSION_COOKIE: &str = "vms_session";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default idle lifetime of a session (8 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure for VMS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VmsConfig {
    /// Application identity.
    #[serde(default)]
    pub app: AppConfig,

    /// Special routing destinations.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Role dashboards; empty means the built-in dashboards.
    #[serde(default)]
    pub dashboards: BTreeMap<String, String>,

    /// Per-role menus; empty means the built-in navigation table.
    #[serde(default)]
    pub navigation: BTreeMap<String, Vec<NavEntryConfig>>,

    /// Routes that declare their own required-role list.
    #[serde(default)]
    pub routes: Vec<RouteRequirement>,

    /// Accounts for the built-in user directory.
    #[serde(default)]
    pub users: Vec<UserConfig>,

    /// HTTP server configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VmsConfig {
    /// Validates the entire configuration.
    ///
    /// Checks role keys, path syntax, per-role completeness of the
    /// navigation and dashboard maps, group shape, user uniqueness and
    /// password hash format.
    pub fn validate(&self) -> ConfigResult<()> {
        self.app.validate()?;
        self.routing.validate()?;
        self.validate_dashboards()?;
        self.validate_navigation()?;
        self.validate_routes()?;
        self.validate_users()?;
        self.api.validate()?;
        Ok(())
    }

    /// Returns `true` if the navigation table comes from this file.
    pub fn has_custom_navigation(&self) -> bool {
        !self.navigation.is_empty()
    }

    fn validate_dashboards(&self) -> ConfigResult<()> {
        if self.dashboards.is_empty() {
            return Ok(());
        }
        for (key, path) in &self.dashboards {
            parse_role_key(&format!("dashboards.{key}"), key)?;
            parse_path(&format!("dashboards.{key}"), path)?;
        }
        require_every_role("dashboards", self.dashboards.keys())
    }

    fn validate_navigation(&self) -> ConfigResult<()> {
        if self.navigation.is_empty() {
            return Ok(());
        }
        for (key, entries) in &self.navigation {
            let field = format!("navigation.{key}");
            parse_role_key(&field, key)?;
            if entries.is_empty() {
                return Err(ConfigError::validation(field, "role has no navigation entries"));
            }
            for (i, entry) in entries.iter().enumerate() {
                entry.validate(&format!("{field}[{i}]"))?;
            }
        }
        require_every_role("navigation", self.navigation.keys())
    }

    fn validate_routes(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for (i, route) in self.routes.iter().enumerate() {
            let field = format!("routes[{i}]");
            let destination = parse_path(&format!("{field}.path"), &route.path)?;
            if !seen.insert(destination) {
                return Err(ConfigError::validation(
                    format!("{field}.path"),
                    format!("duplicate route '{}'", route.path),
                ));
            }
            for (j, key) in route.required_roles.iter().enumerate() {
                parse_role_key(&format!("{field}.required_roles[{j}]"), key)?;
            }
        }
        Ok(())
    }

    fn validate_users(&self) -> ConfigResult<()> {
        let mut ids = HashSet::new();
        let mut emails = HashSet::new();
        for (i, user) in self.users.iter().enumerate() {
            let field = format!("users[{i}]");
            user.validate(&field)?;
            if let Some(id) = user.id {
                if !ids.insert(id) {
                    return Err(ConfigError::validation(
                        format!("{field}.id"),
                        format!("duplicate user id '{id}'"),
                    ));
                }
            }
            if !emails.insert(user.email.trim().to_lowercase()) {
                return Err(ConfigError::validation(
                    format!("{field}.email"),
                    format!("duplicate email '{}'", user.email),
                ));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Application
// =============================================================================

/// Application identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Deployment environment label.
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_app_name() -> String {
    "Visitor Management System".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

impl AppConfig {
    /// Validates the application configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::validation("app.name", "cannot be empty"));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            environment: default_environment(),
        }
    }
}

// =============================================================================
// Routing
// =============================================================================

/// Special destinations used by the route guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Sign-in screen.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Access-denied screen.
    #[serde(default = "default_denied_path")]
    pub denied_path: String,

    /// Generic root.
    #[serde(default = "default_root_path")]
    pub root_path: String,

    /// Generic dashboard alias.
    #[serde(default = "default_dashboard_alias")]
    pub dashboard_alias: String,

    /// Destinations reachable without a session, besides login.
    #[serde(default)]
    pub public_paths: Vec<String>,
}

fn default_login_path() -> String {
    LOGIN_PATH.to_string()
}

fn default_denied_path() -> String {
    DENIED_PATH.to_string()
}

fn default_root_path() -> String {
    ROOT_PATH.to_string()
}

fn default_dashboard_alias() -> String {
    DASHBOARD_ALIAS_PATH.to_string()
}

impl RoutingConfig {
    /// Validates the routing configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let special = [
            ("routing.login_path", &self.login_path),
            ("routing.denied_path", &self.denied_path),
            ("routing.root_path", &self.root_path),
            ("routing.dashboard_alias", &self.dashboard_alias),
        ];

        let mut seen = HashSet::new();
        for (field, raw) in special {
            let destination = parse_path(field, raw)?;
            if !seen.insert(destination) {
                return Err(ConfigError::validation(
                    field,
                    format!("'{raw}' is already used by another routing path"),
                ));
            }
        }

        for (i, raw) in self.public_paths.iter().enumerate() {
            let field = format!("routing.public_paths[{i}]");
            let destination = parse_path(&field, raw)?;
            if seen.contains(&destination) {
                return Err(ConfigError::validation(
                    field,
                    format!("'{raw}' is a routing path and cannot be public"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            denied_path: default_denied_path(),
            root_path: default_root_path(),
            dashboard_alias: default_dashboard_alias(),
            public_paths: Vec::new(),
        }
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// A configured menu entry: a leaf with `path` or a group with `children`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavEntryConfig {
    /// Menu label.
    pub label: String,

    /// Icon name.
    #[serde(default)]
    pub icon: String,

    /// Leaf destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Group children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NavLinkConfig>>,
}

impl NavEntryConfig {
    /// Validates one entry.
    pub fn validate(&self, field: &str) -> ConfigResult<()> {
        if self.label.trim().is_empty() {
            return Err(ConfigError::validation(
                format!("{field}.label"),
                "cannot be empty",
            ));
        }
        match (&self.path, &self.children) {
            (Some(path), None) => {
                parse_path(&format!("{field}.path"), path)?;
            }
            (None, Some(children)) => {
                if children.is_empty() {
                    return Err(ConfigError::validation(
                        format!("{field}.children"),
                        format!("group '{}' has no children", self.label),
                    ));
                }
                for (i, child) in children.iter().enumerate() {
                    child.validate(&format!("{field}.children[{i}]"))?;
                }
            }
            (Some(_), Some(_)) => {
                return Err(ConfigError::validation(
                    field,
                    "entry declares both 'path' and 'children'",
                ));
            }
            (None, None) => {
                return Err(ConfigError::validation(
                    field,
                    "entry must declare either 'path' or 'children'",
                ));
            }
        }
        Ok(())
    }
}

/// A group child. Children cannot nest further.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLinkConfig {
    /// Menu label.
    pub label: String,

    /// Icon name.
    #[serde(default)]
    pub icon: String,

    /// Destination.
    pub path: String,
}

impl NavLinkConfig {
    /// Validates one child.
    pub fn validate(&self, field: &str) -> ConfigResult<()> {
        if self.label.trim().is_empty() {
            return Err(ConfigError::validation(
                format!("{field}.label"),
                "cannot be empty",
            ));
        }
        parse_path(&format!("{field}.path"), &self.path)?;
        Ok(())
    }
}

/// A route that declares its own required-role list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteRequirement {
    /// Route destination.
    pub path: String,

    /// Role keys the route admits.
    #[serde(default)]
    pub required_roles: Vec<String>,
}

// =============================================================================
// Users
// =============================================================================

/// An account in the built-in user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// Stable id; generated when omitted.
    #[serde(default)]
    pub id: Option<Uuid>,

    /// Display name.
    pub name: String,

    /// Sign-in email.
    pub email: String,

    /// Role key.
    pub role: String,

    /// Argon2 PHC hash.
    pub password_hash: String,

    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,

    /// Department.
    #[serde(default)]
    pub department: Option<String>,

    /// Disabled accounts cannot sign in.
    #[serde(default = "default_enabled")]
    pub active: bool,
}

fn default_enabled() -> bool {
    true
}

impl UserConfig {
    /// Validates one account.
    pub fn validate(&self, field: &str) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::validation(
                format!("{field}.name"),
                "cannot be empty",
            ));
        }
        if !self.email.contains('@') {
            return Err(ConfigError::validation(
                format!("{field}.email"),
                format!("'{}' is not an email address", self.email),
            ));
        }
        parse_role_key(&format!("{field}.role"), &self.role)?;
        if !vms_core::is_password_hash(&self.password_hash) {
            return Err(ConfigError::validation(
                format!("{field}.password_hash"),
                "expected an Argon2 PHC string (see `vms hash-password`)",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// API Configuration
// =============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Whether the server is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,

    /// Listen port.
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Session cookie name.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,

    /// Send the session cookie over HTTPS only.
    #[serde(default = "default_enabled")]
    pub secure_cookie: bool,

    /// Idle seconds after which a session expires.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
}

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}

fn default_session_cookie() -> String {
    DEFAULT_SESSION_COOKIE.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

impl ApiConfig {
    /// Validates the API configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "api.request_timeout_secs",
                "cannot be zero",
            ));
        }
        if self.session_ttl_secs == 0 {
            return Err(ConfigError::validation("api.session_ttl_secs", "cannot be zero"));
        }
        let cookie_ok = !self.session_cookie.is_empty()
            && self
                .session_cookie
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !cookie_ok {
            return Err(ConfigError::validation(
                "api.session_cookie",
                "must be non-empty and contain only letters, digits, '_' or '-'",
            ));
        }
        Ok(())
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the session idle lifetime as a Duration.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Returns the socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: default_bind_address(),
            port: DEFAULT_API_PORT,
            session_cookie: default_session_cookie(),
            secure_cookie: true,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Single-line compact text.
    Compact,
    /// JSON lines.
    Json,
}

impl LogFormat {
    /// Parses a format name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "compact" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

// =============================================================================
// Field Helpers
// =============================================================================

/// Parses a canonical role key, with hints for near misses.
pub(crate) fn parse_role_key(field: &str, key: &str) -> ConfigResult<Role> {
    if let Some(role) = Role::from_key(key) {
        return Ok(role);
    }
    let normalized = vms_core::normalize_role_key(key);
    let hint = if normalized == "security" {
        " (the guard role is 'security_guard')".to_string()
    } else if let Some(role) = Role::from_key(&normalized) {
        format!(" (did you mean '{role}'?)")
    } else {
        String::new()
    };
    Err(ConfigError::validation(
        field,
        format!("unknown role '{key}'{hint}"),
    ))
}

/// Parses a configured path, rejecting query strings and fragments.
pub(crate) fn parse_path(field: &str, raw: &str) -> ConfigResult<Destination> {
    if raw.contains('?') || raw.contains('#') {
        return Err(ConfigError::validation(
            field,
            format!("'{raw}' must not contain a query string or fragment"),
        ));
    }
    Destination::parse(raw).map_err(|e| ConfigError::validation(field, e.to_string()))
}

fn require_every_role<'a>(
    section: &str,
    keys: impl Iterator<Item = &'a String>,
) -> ConfigResult<()> {
    let present: HashSet<&str> = keys.map(String::as_str).collect();
    for role in Role::ALL {
        if !present.contains(role.as_str()) {
            return Err(ConfigError::validation(
                format!("{section}.{role}"),
                "every role must be configured",
            ));
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(label: &str, path: &str) -> NavEntryConfig {
        NavEntryConfig {
            label: label.to_string(),
            icon: String::new(),
            path: Some(path.to_string()),
            children: None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = VmsConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.has_custom_navigation());
        assert_eq!(config.api.port, DEFAULT_API_PORT);
        assert_eq!(config.routing.login_path, "/login");
    }

    #[test]
    fn test_security_role_rejected_with_hint() {
        let err = parse_role_key("users[0].role", "security").unwrap_err();
        assert!(err.to_string().contains("security_guard"));

        let err = parse_role_key("users[0].role", "Admin").unwrap_err();
        assert!(err.to_string().contains("did you mean 'admin'"));

        assert_eq!(
            parse_role_key("users[0].role", "security_guard").unwrap(),
            Role::SecurityGuard
        );
    }

    #[test]
    fn test_entry_shape() {
        assert!(leaf("Home", "/home").validate("e").is_ok());

        let both = NavEntryConfig {
            children: Some(vec![]),
            ..leaf("Home", "/home")
        };
        assert!(both.validate("e").is_err());

        let neither = NavEntryConfig {
            path: None,
            ..leaf("Home", "/home")
        };
        assert!(neither.validate("e").is_err());

        let empty_group = NavEntryConfig {
            path: None,
            children: Some(vec![]),
            ..leaf("Visitors", "/unused")
        };
        assert!(empty_group.validate("e").is_err());
    }

    #[test]
    fn test_path_rules() {
        assert!(parse_path("p", "/check-in").is_ok());
        assert!(parse_path("p", "check-in").is_err());
        assert!(parse_path("p", "/check-in?tab=1").is_err());
        assert!(parse_path("p", "/check in").is_err());
    }

    #[test]
    fn test_navigation_requires_every_role() {
        let mut config = VmsConfig::default();
        config
            .navigation
            .insert("admin".to_string(), vec![leaf("Dashboard", "/admindashboard")]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("navigation.supervisor"));
    }

    #[test]
    fn test_routing_paths_distinct() {
        let mut config = VmsConfig::default();
        config.routing.denied_path = "/login".to_string();
        assert!(config.validate().is_err());

        let mut config = VmsConfig::default();
        config.routing.public_paths = vec!["/dashboard".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_user_validation() {
        let user = UserConfig {
            id: None,
            name: "Gary".to_string(),
            email: "gary@example.com".to_string(),
            role: "security_guard".to_string(),
            password_hash: "plaintext".to_string(),
            phone: None,
            department: None,
            active: true,
        };
        let err = user.validate("users[0]").unwrap_err();
        assert!(err.to_string().contains("password_hash"));
    }

    #[test]
    fn test_api_validation() {
        let mut api = ApiConfig::default();
        assert!(api.validate().is_ok());
        api.session_cookie = "bad cookie".to_string();
        assert!(api.validate().is_err());

        let mut api = ApiConfig::default();
        assert!(api.secure_cookie);
        assert_eq!(api.session_ttl(), Duration::from_secs(DEFAULT_SESSION_TTL_SECS));
        api.session_ttl_secs = 0;
        assert!(api.validate().is_err());
    }

    #[test]
    fn test_log_level_and_format_parse() {
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Text));
    }
}
