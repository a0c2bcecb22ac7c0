// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::error::BinResult;

/// Prints version information for every crate.
pub fn version() -> BinResult<()> {
    println!("VMS - Visitor management access layer");
    println!();
    println!("Version Information:");
    println!("  vms-bin:    {}", crate::VERSION);
    println!("  vms-core:   {}", vms_core::VERSION);
    println!("  vms-config: {}", vms_config::VERSION);
    println!("  vms-web:    {}", vms_web::VERSION);
    println!();
    println!("Build Information:");
    println!("  Rust Edition: 2024");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
