// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Navigation table.
//!
//! The table is the single source of truth for what each role may reach. The
//! menu renderer reads the entries directly; the route guard flattens the same
//! entries through [`crate::resolver::resolve_allowed`].

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::destination::Destination;
use crate::error::{AccessError, AccessResult};
use crate::role::Role;

// =============================================================================
// NavLink / NavigationEntry
// =============================================================================

/// A menu item with a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    /// Display label.
    pub label: String,
    /// Icon reference understood by the menu renderer.
    pub icon: String,
    /// Where the item navigates.
    pub destination: Destination,
}

impl NavLink {
    /// Creates a link.
    pub fn new(label: impl Into<String>, icon: impl Into<String>, destination: Destination) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
            destination,
        }
    }
}

/// A top-level menu item: either a link or a group of links.
///
/// Group children are [`NavLink`]s, so groups cannot nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationEntry {
    /// A direct link.
    Leaf(NavLink),
    /// A labelled submenu without a destination of its own.
    Group {
        /// Display label.
        label: String,
        /// Icon reference.
        icon: String,
        /// Ordered child links.
        children: Vec<NavLink>,
    },
}

impl NavigationEntry {
    /// Creates a leaf entry.
    pub fn leaf(label: impl Into<String>, icon: impl Into<String>, destination: Destination) -> Self {
        Self::Leaf(NavLink::new(label, icon, destination))
    }

    /// Creates a group entry.
    pub fn group(label: impl Into<String>, icon: impl Into<String>, children: Vec<NavLink>) -> Self {
        Self::Group {
            label: label.into(),
            icon: icon.into(),
            children,
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        match self {
            Self::Leaf(link) => &link.label,
            Self::Group { label, .. } => label,
        }
    }

    /// Returns the icon reference.
    pub fn icon(&self) -> &str {
        match self {
            Self::Leaf(link) => &link.icon,
            Self::Group { icon, .. } => icon,
        }
    }

    /// Returns the entry's own destination (`None` for groups).
    pub fn destination(&self) -> Option<&Destination> {
        match self {
            Self::Leaf(link) => Some(&link.destination),
            Self::Group { .. } => None,
        }
    }

    /// Returns the child links (empty for leaves).
    pub fn children(&self) -> &[NavLink] {
        match self {
            Self::Leaf(_) => &[],
            Self::Group { children, .. } => children,
        }
    }

    /// Returns `true` for groups.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group { .. })
    }

    /// Every destination reachable through this entry.
    pub fn destinations(&self) -> impl Iterator<Item = &Destination> {
        self.destination()
            .into_iter()
            .chain(self.children().iter().map(|child| &child.destination))
    }
}

// =============================================================================
// NavigationTable
// =============================================================================

/// Read-only mapping from role to its ordered menu.
#[derive(Debug, Clone, Default)]
pub struct NavigationTable {
    entries: HashMap<Role, Vec<NavigationEntry>>,
}

impl NavigationTable {
    /// Creates a table builder.
    pub fn builder() -> NavigationTableBuilder {
        NavigationTableBuilder::new()
    }

    /// The visitor-management menu shipped with the application.
    pub fn standard() -> Self {
        let mut entries = HashMap::new();
        for role in Role::ALL {
            entries.insert(role, standard_entries(role));
        }
        Self { entries }
    }

    /// Returns the entries for a normalized role key.
    ///
    /// The key is matched case-sensitively; unknown keys yield no entries.
    pub fn entries_for(&self, role: &str) -> &[NavigationEntry] {
        Role::from_key(role)
            .map(|role| self.entries_for_role(role))
            .unwrap_or(&[])
    }

    /// Returns the entries for a role.
    pub fn entries_for_role(&self, role: Role) -> &[NavigationEntry] {
        self.entries.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the menu the renderer should display for a normalized role key.
    ///
    /// This is the same slice the allowed-destination resolver flattens.
    pub fn menu_for(&self, role: &str) -> &[NavigationEntry] {
        self.entries_for(role)
    }

    /// Returns `true` if the role has at least one entry.
    pub fn contains_role(&self, role: Role) -> bool {
        !self.entries_for_role(role).is_empty()
    }

    /// Returns the roles present in the table, in declaration order.
    pub fn roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.entries.contains_key(role))
            .collect()
    }

    /// Returns every role whose navigation reaches `destination`.
    ///
    /// This is the required-role list for a route, derived from the table.
    pub fn roles_for(&self, destination: &Destination) -> BTreeSet<Role> {
        self.entries
            .iter()
            .filter(|(_, entries)| {
                entries
                    .iter()
                    .flat_map(NavigationEntry::destinations)
                    .any(|d| d == destination)
            })
            .map(|(role, _)| *role)
            .collect()
    }
}

// =============================================================================
// NavigationTableBuilder
// =============================================================================

/// Builder for navigation tables.
#[derive(Debug, Default)]
pub struct NavigationTableBuilder {
    entries: HashMap<Role, Vec<NavigationEntry>>,
}

impl NavigationTableBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the standard table.
    pub fn with_standard_roles(mut self) -> Self {
        for role in Role::ALL {
            self.entries.insert(role, standard_entries(role));
        }
        self
    }

    /// Replaces the entries of a role.
    pub fn role(mut self, role: Role, entries: Vec<NavigationEntry>) -> Self {
        self.entries.insert(role, entries);
        self
    }

    /// Appends one entry to a role.
    pub fn entry(mut self, role: Role, entry: NavigationEntry) -> Self {
        self.entries.entry(role).or_default().push(entry);
        self
    }

    /// Builds the table, rejecting empty groups.
    pub fn build(self) -> AccessResult<NavigationTable> {
        for (role, entries) in &self.entries {
            for entry in entries {
                if entry.is_group() && entry.children().is_empty() {
                    return Err(AccessError::empty_group(role.as_str(), entry.label()));
                }
            }
        }
        Ok(NavigationTable {
            entries: self.entries,
        })
    }
}

// =============================================================================
// Standard menu
// =============================================================================

fn link(label: &str, icon: &str, path: &'static str) -> NavLink {
    NavLink::new(label, icon, Destination::from_static(path))
}

fn leaf(label: &str, icon: &str, path: &'static str) -> NavigationEntry {
    NavigationEntry::Leaf(link(label, icon, path))
}

fn dashboard(role: Role) -> NavigationEntry {
    leaf("Dashboard", "layout-dashboard", role.default_dashboard())
}

fn standard_entries(role: Role) -> Vec<NavigationEntry> {
    match role {
        Role::Admin => vec![
            dashboard(role),
            NavigationEntry::group(
                "Visitors",
                "users",
                vec![
                    link("Check In", "log-in", "/check-in"),
                    link("Check Out", "log-out", "/check-out"),
                    link("Scheduled Visitors", "calendar-clock", "/scheduled-visitors"),
                    link("Visitor Log", "clipboard-list", "/visitor-log"),
                ],
            ),
            NavigationEntry::group(
                "Reports",
                "file-bar-chart",
                vec![
                    link("Visitor Reports", "bar-chart-3", "/reports"),
                    link("Shift Reports", "shield-check", "/shift-reports"),
                ],
            ),
            leaf("User Management", "user-cog", "/user-management"),
            leaf("Settings", "settings", "/settings"),
        ],
        Role::Supervisor => vec![
            dashboard(role),
            NavigationEntry::group(
                "Visitors",
                "users",
                vec![
                    link("Check In", "log-in", "/check-in"),
                    link("Check Out", "log-out", "/check-out"),
                    link("Scheduled Visitors", "calendar-clock", "/scheduled-visitors"),
                    link("Visitor Log", "clipboard-list", "/visitor-log"),
                ],
            ),
            leaf("Shift Reports", "shield-check", "/shift-reports"),
            leaf("Reports", "file-bar-chart", "/reports"),
        ],
        Role::Manager => vec![
            dashboard(role),
            leaf("Visitor Log", "clipboard-list", "/visitor-log"),
            NavigationEntry::group(
                "Reports",
                "file-bar-chart",
                vec![
                    link("Visitor Reports", "bar-chart-3", "/reports"),
                    link("Shift Reports", "shield-check", "/shift-reports"),
                ],
            ),
        ],
        Role::SecurityGuard => vec![
            dashboard(role),
            NavigationEntry::group(
                "Visitors",
                "users",
                vec![
                    link("Check In", "log-in", "/check-in"),
                    link("Check Out", "log-out", "/check-out"),
                    link("Visitor Log", "clipboard-list", "/visitor-log"),
                ],
            ),
            leaf("Shift Report", "shield-check", "/shift-report"),
        ],
        Role::User => vec![
            dashboard(role),
            NavigationEntry::group(
                "Visits",
                "calendar",
                vec![
                    link("Schedule a Visit", "calendar-plus", "/schedule-visit"),
                    link("My Visits", "calendar-days", "/my-visits"),
                ],
            ),
            leaf("Profile", "user", "/profile"),
        ],
    }
}

// =============================================================================
// Tests
// =============================================================================
