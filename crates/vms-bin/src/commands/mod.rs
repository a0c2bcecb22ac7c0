// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.

mod check;
mod hash_password;
mod menu;
mod serve;
mod validate;
mod version;

pub use check::check;
pub use hash_password::hash_password;
pub use menu::menu;
pub use serve::serve;
pub use validate::validate;
pub use version::version;

use vms_config::{ConfigLoader, VmsConfig};

use crate::cli::{Cli, Commands};
use crate::error::BinResult;
use crate::logging::init_logging;

/// Executes the command named on the command line.
///
/// Logging is initialized here, after the configuration is loaded, so the
/// file's `logging` section applies when no flag overrides it.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Serve(args) => {
            let config = load_config(&cli)?;
            init_logging(
                &cli.effective_log_level(Some(&config.logging)),
                cli.effective_log_format(Some(&config.logging)),
            );
            serve::serve(config, args).await
        }
        Commands::Validate(args) => {
            init_logging(&cli.effective_log_level(None), cli.effective_log_format(None));
            validate::validate(&cli, args)
        }
        Commands::Check(args) => {
            init_logging(&cli.effective_log_level(None), cli.effective_log_format(None));
            check::check(&load_config(&cli)?, args)
        }
        Commands::Menu(args) => {
            init_logging(&cli.effective_log_level(None), cli.effective_log_format(None));
            menu::menu(&load_config(&cli)?, args)
        }
        Commands::HashPassword(args) => hash_password::hash_password(args),
        Commands::Version => version::version(),
    }
}

/// Loads the configuration named by `--config`, or the built-in defaults.
pub fn load_config(cli: &Cli) -> BinResult<VmsConfig> {
    let loader = ConfigLoader::new();
    let config = match &cli.config {
        Some(path) => loader.load(path)?,
        None => loader.load_default()?,
    };
    Ok(config)
}
