// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Navigable destinations.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AccessError, AccessResult};

/// Generic root path.
pub const ROOT_PATH: &str = "/";

/// Generic dashboard alias, redirected to the role dashboard.
pub const DASHBOARD_ALIAS_PATH: &str = "/dashboard";

/// Sign-in screen.
pub const LOGIN_PATH: &str = "/login";

/// Access-denied screen.
pub const DENIED_PATH: &str = "/unauthorized";

// =============================================================================
// Destination
// =============================================================================

/// A normalized absolute path identifying a screen.
///
/// Query strings and fragments are dropped and a trailing slash is removed
/// (except for the root), so `/check-in/?tab=1` and `/check-in` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Destination(String);

impl Destination {
    /// Parses and normalizes a path.
    pub fn parse(raw: &str) -> AccessResult<Self> {
        let trimmed = raw.trim();
        let path = trimmed
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        if path.is_empty() {
            return Err(AccessError::invalid_destination(raw, "path is empty"));
        }
        if !path.starts_with('/') {
            return Err(AccessError::invalid_destination(raw, "must start with '/'"));
        }
        if path.chars().any(char::is_whitespace) {
            return Err(AccessError::invalid_destination(
                raw,
                "must not contain whitespace",
            ));
        }

        let normalized = path.trim_end_matches('/');
        if normalized.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self(normalized.to_string()))
    }

    /// The generic root destination.
    pub fn root() -> Self {
        Self(ROOT_PATH.to_string())
    }

    /// Builds a destination from a path known to be normalized.
    pub(crate) fn from_static(path: &'static str) -> Self {
        debug_assert!(Self::parse(path).map(|d| d.0 == path).unwrap_or(false));
        Self(path.to_string())
    }

    /// Returns the path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for `/`.
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_PATH
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Destination {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Destination {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Destination {
    type Error = AccessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Destination {
    type Error = AccessError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Destination> for String {
    fn from(value: Destination) -> Self {
        value.0
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_query_and_trailing_slash() {
        let d = Destination::parse("/check-in/?tab=today#top").unwrap();
        assert_eq!(d.as_str(), "/check-in");
        assert_eq!(Destination::parse("  /reports  ").unwrap().as_str(), "/reports");
    }

    #[test]
    fn test_parse_root() {
        assert!(Destination::parse("/").unwrap().is_root());
        assert!(Destination::parse("///").unwrap().is_root());
        assert!(Destination::parse("/?next=/x").unwrap().is_root());
    }

    #[test]
    fn test_parse_rejects_bad_paths() {
        assert!(Destination::parse("").is_err());
        assert!(Destination::parse("?x=1").is_err());
        assert!(Destination::parse("check-in").is_err());
        assert!(Destination::parse("/check in").is_err());
    }

    #[test]
    fn test_well_known_paths_are_normalized() {
        for path in [ROOT_PATH, DASHBOARD_ALIAS_PATH, LOGIN_PATH, DENIED_PATH] {
            assert_eq!(Destination::parse(path).unwrap().as_str(), path);
        }
    }

    #[test]
    fn test_serde_validates() {
        let d: Destination = serde_json::from_str("\"/visitor-log/\"").unwrap();
        assert_eq!(d.as_str(), "/visitor-log");
        assert!(serde_json::from_str::<Destination>("\"visitor-log\"").is_err());
    }
}
