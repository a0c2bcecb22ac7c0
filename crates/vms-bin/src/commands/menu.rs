// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `menu` command.

use vms_config::VmsConfig;
use vms_core::{NavigationEntry, Role, normalize_role_key};
use vms_web::response::menu_items;

use crate::cli::{MenuArgs, OutputFormat};
use crate::error::{BinError, BinResult};

/// Prints a role's menu, dashboard and allowed destinations.
pub fn menu(config: &VmsConfig, args: MenuArgs) -> BinResult<()> {
    println!("{}", render(config, &args)?);
    Ok(())
}

fn render(config: &VmsConfig, args: &MenuArgs) -> BinResult<String> {
    let role_key = normalize_role_key(&args.role);
    let role = Role::from_key(&role_key).ok_or_else(|| {
        BinError::input(format!(
            "unknown role '{}' (expected one of: {})",
            args.role,
            Role::ALL.map(|role| role.as_str()).join(", ")
        ))
    })?;

    let guard = config.route_guard()?;
    let entries = guard.table().menu_for(&role_key);
    let allowed = guard.table().resolve_allowed(&role_key);
    let dashboard = guard.dashboards().dashboard_for_role(role);

    match args.format {
        OutputFormat::Text => {
            let mut out = format!("{} ({})\n", role.label(), role);
            out.push_str(&format!("Dashboard: {}\n\nMenu:\n", dashboard));
            for entry in entries {
                write_entry(&mut out, entry);
            }
            out.push_str("\nAllowed destinations:\n");
            for destination in allowed.sorted() {
                out.push_str(&format!("  {}\n", destination));
            }
            Ok(out.trim_end().to_string())
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "role": role,
                "dashboard": dashboard,
                "menu": menu_items(entries),
                "allowed": allowed.sorted(),
            });
            serde_json::to_string_pretty(&output).map_err(|e| BinError::runtime(e.to_string()))
        }
    }
}

fn write_entry(out: &mut String, entry: &NavigationEntry) {
    match entry.destination() {
        Some(destination) => out.push_str(&format!("  {:<22} {}\n", entry.label(), destination)),
        None => {
            out.push_str(&format!("  {}\n", entry.label()));
            for child in entry.children() {
                out.push_str(&format!("    {:<20} {}\n", child.label, child.destination));
            }
        }
    }
}
