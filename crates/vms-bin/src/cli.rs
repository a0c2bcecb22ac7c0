// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `serve`: run the web server (default)
//! - `validate`: load the configuration and print the consistency report
//! - `check`: evaluate the route guard for one destination
//! - `menu`: print a role's menu and allowed destinations
//! - `hash-password`: produce a password hash for `users[].password_hash`
//! - `version`: show version information

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vms_config::LoggingConfig;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// VMS - role-based navigation and route guarding for the visitor
/// management system.
#[derive(Parser, Debug)]
#[command(
    name = "vms",
    author = "Sylvex <contact@sylvex.io>",
    version = vms_core::VERSION,
    about = "Visitor management access layer",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path (built-in defaults when omitted)
    #[arg(short, long, env = "VMS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VMS_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format
    #[arg(long, env = "VMS_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the web server
    ///
    /// This is the default command when no subcommand is specified.
    Serve(ServeArgs),

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration, then reports drift between the
    /// navigation table, the dashboards and declared route requirements.
    Validate(ValidateArgs),

    /// Evaluate the route guard for one destination
    Check(CheckArgs),

    /// Print a role's menu and allowed destinations
    Menu(MenuArgs),

    /// Hash a password for the user directory
    #[command(name = "hash-password")]
    HashPassword(HashPasswordArgs),

    /// Show version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `serve` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the bind address
    #[arg(long)]
    pub bind: Option<IpAddr>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Show the parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Fail when the consistency report is not empty
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `check` command.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Destination to evaluate
    pub path: String,

    /// Role of the signed-in principal
    #[arg(short, long, required_unless_present = "anonymous")]
    pub role: Option<String>,

    /// Evaluate without a session
    #[arg(long, conflicts_with = "role")]
    pub anonymous: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `menu` command.
#[derive(Args, Debug, Clone)]
pub struct MenuArgs {
    /// Role whose menu to print
    #[arg(short, long)]
    pub role: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `hash-password` command.
#[derive(Args, Debug, Clone)]
pub struct HashPasswordArgs {
    /// Password to hash
    #[arg(required_unless_present = "stdin")]
    pub password: Option<String>,

    /// Read the password from stdin
    #[arg(long)]
    pub stdin: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON lines
    Json,
    /// Single-line compact text
    Compact,
}

impl From<vms_config::LogFormat> for LogFormat {
    fn from(format: vms_config::LogFormat) -> Self {
        match format {
            vms_config::LogFormat::Text => Self::Text,
            vms_config::LogFormat::Compact => Self::Compact,
            vms_config::LogFormat::Json => Self::Json,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the command to run, defaulting to `serve`.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Serve(ServeArgs::default()))
    }

    /// Returns the log level: `-q`/`-v` first, then `--log-level`, then the
    /// configuration file, then `info`.
    pub fn effective_log_level(&self, file: Option<&LoggingConfig>) -> String {
        if self.quiet {
            "warn".to_string()
        } else if self.verbose {
            "debug".to_string()
        } else if let Some(level) = &self.log_level {
            level.clone()
        } else {
            file.map(|logging| logging.level.as_str())
                .unwrap_or("info")
                .to_string()
        }
    }

    /// Returns the log format: `--log-format`, then the configuration file.
    pub fn effective_log_format(&self, file: Option<&LoggingConfig>) -> LogFormat {
        self.log_format
            .or_else(|| file.map(|logging| logging.format.into()))
            .unwrap_or_default()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["vms"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Serve(_)));
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["vms", "serve", "--port", "9090", "--bind", "127.0.0.1"]);
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("Expected Serve command");
        };
        assert_eq!(args.port, Some(9090));
        assert_eq!(args.bind, Some("127.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["vms", "validate", "--strict", "-f", "json"]);
        let Some(Commands::Validate(args)) = cli.command else {
            panic!("Expected Validate command");
        };
        assert!(args.strict);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_check_requires_role_or_anonymous() {
        assert!(Cli::try_parse_from(["vms", "check", "/check-in"]).is_err());
        assert!(
            Cli::try_parse_from(["vms", "check", "/check-in", "--role", "admin", "--anonymous"])
                .is_err()
        );

        let cli = Cli::parse_from(["vms", "check", "/check-in", "--anonymous"]);
        let Some(Commands::Check(args)) = cli.command else {
            panic!("Expected Check command");
        };
        assert!(args.anonymous);
        assert!(args.role.is_none());
    }

    #[test]
    fn test_hash_password_command() {
        let cli = Cli::parse_from(["vms", "hash-password", "s3cret"]);
        let Some(Commands::HashPassword(args)) = cli.command else {
            panic!("Expected HashPassword command");
        };
        assert_eq!(args.password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["vms", "-c", "/etc/vms/vms.yaml", "version"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/vms/vms.yaml")));
    }

    #[test]
    fn test_log_level_precedence() {
        let file = LoggingConfig {
            level: vms_config::LogLevel::Error,
            format: vms_config::LogFormat::Json,
        };

        let cli = Cli::parse_from(["vms", "--log-level", "trace"]);
        assert_eq!(cli.effective_log_level(Some(&file)), "trace");

        let cli = Cli::parse_from(["vms", "-q", "--log-level", "trace"]);
        assert_eq!(cli.effective_log_level(Some(&file)), "warn");

        let cli = Cli::parse_from(["vms", "-v"]);
        assert_eq!(cli.effective_log_level(None), "debug");
    }

    #[test]
    fn test_log_format_precedence() {
        let file = LoggingConfig {
            level: vms_config::LogLevel::Info,
            format: vms_config::LogFormat::Compact,
        };
        let cli = Cli::parse_from(["vms", "--log-format", "json"]);
        assert_eq!(cli.effective_log_format(Some(&file)), LogFormat::Json);

        let cli = Cli::parse_from(["vms"]);
        if cli.log_format.is_none() {
            assert_eq!(cli.effective_log_format(Some(&file)), LogFormat::Compact);
            assert_eq!(cli.effective_log_format(None), LogFormat::Text);
        }
    }
}
