// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Response bodies.

use serde::Serialize;
use uuid::Uuid;
use vms_core::{Destination, NavLink, NavigationEntry, Principal};

// =============================================================================
// Health
// =============================================================================

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `healthy` when the process answers.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            version: crate::VERSION,
        }
    }
}

// =============================================================================
// Menu
// =============================================================================

/// One menu item as the renderer draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// Label.
    pub label: String,
    /// Icon reference.
    pub icon: String,
    /// Destination; absent for groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Destination>,
    /// Group children.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl From<&NavLink> for MenuItem {
    fn from(link: &NavLink) -> Self {
        Self {
            label: link.label.clone(),
            icon: link.icon.clone(),
            path: Some(link.destination.clone()),
            children: Vec::new(),
        }
    }
}

impl From<&NavigationEntry> for MenuItem {
    fn from(entry: &NavigationEntry) -> Self {
        Self {
            label: entry.label().to_string(),
            icon: entry.icon().to_string(),
            path: entry.destination().cloned(),
            children: entry.children().iter().map(MenuItem::from).collect(),
        }
    }
}

/// Converts a role's entries into menu items.
pub fn menu_items(entries: &[NavigationEntry]) -> Vec<MenuItem> {
    entries.iter().map(MenuItem::from).collect()
}

/// Navigation data for the signed-in principal.
#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    /// Normalized role key.
    pub role: String,
    /// Role dashboard.
    pub dashboard: Destination,
    /// Menu, in display order.
    pub menu: Vec<MenuItem>,
    /// Allowed destinations, sorted.
    pub allowed: Vec<Destination>,
}

// =============================================================================
// Session
// =============================================================================

/// Successful sign-in.
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    /// Session token; also set as a cookie.
    pub token: Uuid,
    /// The principal.
    pub principal: Principal,
    /// Where the client should navigate next.
    pub landing: Destination,
}

/// Current session snapshot.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// `loading`, `absent` or `present`.
    pub state: &'static str,
    /// The principal, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
}

/// Sign-out result.
#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    /// `false` when there was no session to close.
    pub signed_out: bool,
}

// =============================================================================
// Pages
// =============================================================================

/// A rendered page.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    /// The rendered destination.
    pub destination: Destination,
    /// The principal, absent on public pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    /// The principal's menu.
    pub menu: Vec<MenuItem>,
}
