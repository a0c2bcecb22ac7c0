// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use vms_config::VmsConfig;
use vms_core::ConfigDefect;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::commands::load_config;
use crate::error::{BinError, BinResult};

/// Loads the configuration, then prints the summary and consistency report.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let source = cli
        .config
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(built-in defaults)".to_string());

    let config = load_config(cli).map_err(|e| e.with_context("Configuration validation failed"))?;
    let defects = config.consistency_report()?;

    println!("{}", render(&source, &config, &defects, &args)?);

    if args.strict && !defects.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} consistency defect(s) found",
            defects.len()
        )));
    }

    Ok(())
}

fn render(
    source: &str,
    config: &VmsConfig,
    defects: &[ConfigDefect],
    args: &ValidateArgs,
) -> BinResult<String> {
    match args.format {
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!("Configuration is valid: {}\n\n", source));
            out.push_str("Summary:\n");
            out.push_str(&format!("  App:         {}\n", config.app.name));
            out.push_str(&format!("  Environment: {}\n", config.app.environment));
            out.push_str(&format!(
                "  Navigation:  {}\n",
                if config.has_custom_navigation() { "custom" } else { "standard" }
            ));
            out.push_str(&format!("  Routes:      {}\n", config.routes.len()));
            out.push_str(&format!("  Users:       {}\n", config.users.len()));
            out.push_str(&format!(
                "  API:         {}\n",
                if config.api.enabled {
                    config.api.socket_addr().to_string()
                } else {
                    "disabled".to_string()
                }
            ));

            if defects.is_empty() {
                out.push_str("\nNo consistency defects.");
            } else {
                out.push_str("\nConsistency defects:\n");
                for defect in defects {
                    out.push_str(&format!("  - {}\n", defect));
                }
            }

            if args.show_config {
                let parsed = serde_json::to_string_pretty(config)
                    .map_err(|e| BinError::runtime(e.to_string()))?;
                out.push_str("\n\nParsed configuration:\n");
                out.push_str(&parsed);
            }
            Ok(out.trim_end().to_string())
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": source,
                "summary": {
                    "app": config.app.name,
                    "environment": config.app.environment,
                    "custom_navigation": config.has_custom_navigation(),
                    "routes": config.routes.len(),
                    "users": config.users.len(),
                    "api_enabled": config.api.enabled,
                    "api_address": config.api.socket_addr().to_string(),
                },
                "defects": defects,
                "config": if args.show_config { Some(config) } else { None },
            });
            serde_json::to_string_pretty(&output).map_err(|e| BinError::runtime(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    const MANAGER_DRIFT: &str = r#"
routes:
  - path: /scheduled-visitors
    required_roles: [admin, manager, supervisor, security_guard, user]
"#;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_clean() {
        let config = VmsConfig::default();
        let defects = config.consistency_report().unwrap();
        assert!(defects.is_empty());

        let text = render("(built-in defaults)", &config, &defects, &ValidateArgs::default()).unwrap();
        assert!(text.contains("No consistency defects"));
    }

    #[test]
    fn test_strict_fails_on_drift() {
        let file = write_config(MANAGER_DRIFT);
        let path = file.path().to_str().unwrap();

        let cli = Cli::parse_from(["vms", "-c", path, "validate"]);
        assert!(validate(&cli, ValidateArgs::default()).is_ok());

        let args = ValidateArgs {
            strict: true,
            ..ValidateArgs::default()
        };
        let err = validate(&cli, args).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_json_lists_defects() {
        let config = vms_config::load_config_str(MANAGER_DRIFT, vms_config::ConfigFormat::Yaml).unwrap();
        let defects = config.consistency_report().unwrap();
        let args = ValidateArgs {
            format: OutputFormat::Json,
            ..ValidateArgs::default()
        };
        let json: serde_json::Value =
            serde_json::from_str(&render("inline", &config, &defects, &args).unwrap()).unwrap();
        assert!(!json["defects"].as_array().unwrap().is_empty());
        assert!(json["config"].is_null());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let cli = Cli::parse_from(["vms", "-c", "/nonexistent/vms.yaml", "validate"]);
        let err = validate(&cli, ValidateArgs::default()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
