// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Allowed-destination resolution.
//!
//! Every caller that needs to know where a role may go uses
//! [`resolve_allowed`]; there is no second copy of the flattening rule.

use std::collections::HashSet;

use serde::Serialize;

use crate::destination::Destination;
use crate::navigation::{NavigationEntry, NavigationTable};

// =============================================================================
// AllowedSet
// =============================================================================

/// The flat set of destinations a role may navigate to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllowedSet {
    destinations: HashSet<Destination>,
}

impl AllowedSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the destination is permitted.
    pub fn contains(&self, destination: &Destination) -> bool {
        self.destinations.contains(destination)
    }

    /// Returns `true` if the normalized path is permitted.
    pub fn contains_path(&self, path: &str) -> bool {
        self.destinations.contains(path)
    }

    /// Returns the number of destinations.
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    /// Returns `true` if nothing is permitted.
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Returns an iterator over the destinations, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }

    /// Returns the destinations sorted by path.
    pub fn sorted(&self) -> Vec<&Destination> {
        let mut sorted: Vec<_> = self.destinations.iter().collect();
        sorted.sort();
        sorted
    }
}

impl FromIterator<Destination> for AllowedSet {
    fn from_iter<I: IntoIterator<Item = Destination>>(iter: I) -> Self {
        Self {
            destinations: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Flattens menu entries into their destinations.
///
/// Leaves contribute their own destination; groups contribute each child's.
pub fn flatten(entries: &[NavigationEntry]) -> AllowedSet {
    entries
        .iter()
        .flat_map(NavigationEntry::destinations)
        .cloned()
        .collect()
}

/// Returns the destinations a normalized role key may reach.
///
/// Total: an unknown role yields an empty set.
pub fn resolve_allowed(table: &NavigationTable, role: &str) -> AllowedSet {
    flatten(table.entries_for(role))
}

impl NavigationTable {
    /// Shorthand for [`resolve_allowed`].
    pub fn resolve_allowed(&self, role: &str) -> AllowedSet {
        resolve_allowed(self, role)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NavLink;
    use crate::role::Role;

    fn dest(path: &str) -> Destination {
        Destination::parse(path).unwrap()
    }

    #[test]
    fn test_flatten_leaves_and_groups() {
        let entries = vec![
            NavigationEntry::leaf("Home", "home", dest("/home")),
            NavigationEntry::group(
                "Visitors",
                "users",
                vec![
                    NavLink::new("In", "log-in", dest("/check-in")),
                    NavLink::new("Out", "log-out", dest("/check-out")),
                ],
            ),
        ];
        let allowed = flatten(&entries);
        assert_eq!(allowed.len(), 3);
        assert!(allowed.contains_path("/home"));
        assert!(allowed.contains_path("/check-in"));
        assert!(allowed.contains_path("/check-out"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let entries = vec![
            NavigationEntry::leaf("Log", "list", dest("/visitor-log")),
            NavigationEntry::group(
                "Visitors",
                "users",
                vec![NavLink::new("Log", "list", dest("/visitor-log"))],
            ),
        ];
        assert_eq!(flatten(&entries).len(), 1);
    }

    #[test]
    fn test_unknown_role_is_empty() {
        let table = NavigationTable::standard();
        assert!(resolve_allowed(&table, "janitor").is_empty());
        assert!(resolve_allowed(&table, "").is_empty());
        assert!(resolve_allowed(&table, "security").is_empty());
    }

    #[test]
    fn test_closed_over_declared_destinations() {
        let table = NavigationTable::standard();
        for role in Role::ALL {
            let allowed = table.resolve_allowed(role.as_str());
            for entry in table.entries_for_role(role) {
                for d in entry.destinations() {
                    assert!(allowed.contains(d), "{role} missing {d}");
                }
            }
        }
    }

    #[test]
    fn test_standard_scenarios() {
        let table = NavigationTable::standard();
        assert!(table.resolve_allowed("admin").contains_path("/user-management"));
        assert!(!table.resolve_allowed("security_guard").contains_path("/user-management"));
        assert!(!table.resolve_allowed("manager").contains_path("/scheduled-visitors"));
    }

    #[test]
    fn test_deterministic() {
        let table = NavigationTable::standard();
        assert_eq!(table.resolve_allowed("supervisor"), table.resolve_allowed("supervisor"));
    }
}
