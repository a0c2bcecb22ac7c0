// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading for VMS.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and resolve `${VAR}` / `${VAR:default}` placeholders
//! 2. Parse YAML/TOML/JSON into [`VmsConfig`]
//! 3. Apply `VMS_*` environment overrides
//! 4. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! VMS_API_PORT=9090
//! VMS_API_ENABLED=false
//! VMS_LOG_LEVEL=debug
//! VMS_LOG_FORMAT=json
//! VMS_LOGIN_PATH=/signin
//! VMS_DENIED_PATH=/forbidden
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{LogFormat, LogLevel, VmsConfig};

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader for VMS.
///
/// # Examples
///
/// ```no_run
/// use vms_config::loader::ConfigLoader;
///
/// let loader = ConfigLoader::new();
/// let config = loader.load("vms.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply overrides.
    resolve_env_vars: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: "VMS".to_string(),
            resolve_env_vars: true,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Loads configuration from a file.
    ///
    /// The format follows the extension: `.yaml`/`.yml`, `.toml` or `.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<VmsConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let format = ConfigFormat::from_path(path)?;
        let content = self.read_file(path)?;
        let content = if self.resolve_env_vars {
            resolve_env_placeholders(&content)
        } else {
            content
        };

        let config = parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })?;

        let config = self.finish(config)?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<VmsConfig> {
        let config = if self.resolve_env_vars {
            parse_str(&resolve_env_placeholders(content), format)?
        } else {
            parse_str(content, format)?
        };
        self.finish(config)
    }

    /// Returns the built-in configuration with environment overrides applied.
    pub fn load_default(&self) -> ConfigResult<VmsConfig> {
        info!("No configuration file given, using built-in defaults");
        self.finish(VmsConfig::default())
    }

    fn finish(&self, mut config: VmsConfig) -> ConfigResult<VmsConfig> {
        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config, |name| env::var(name).ok())?;
        }
        config.validate()?;

        debug!(
            custom_navigation = config.has_custom_navigation(),
            routes = config.routes.len(),
            users = config.users.len(),
            "Configuration validated"
        );
        Ok(config)
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    /// Applies `<PREFIX>_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&self, config: &mut VmsConfig, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| format!("{}_{}", self.env_prefix, suffix);

        if let Some(value) = lookup(&var("API_PORT")) {
            config.api.port = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(var("API_PORT"), "expected valid port number")
            })?;
        }
        if let Some(value) = lookup(&var("API_ENABLED")) {
            config.api.enabled = parse_bool(&value);
        }
        if let Some(value) = lookup(&var("LOG_LEVEL")) {
            config.logging.level = LogLevel::parse(&value).ok_or_else(|| {
                ConfigError::invalid_env_var(var("LOG_LEVEL"), "expected trace|debug|info|warn|error")
            })?;
        }
        if let Some(value) = lookup(&var("LOG_FORMAT")) {
            config.logging.format = LogFormat::parse(&value).ok_or_else(|| {
                ConfigError::invalid_env_var(var("LOG_FORMAT"), "expected text|compact|json")
            })?;
        }
        if let Some(value) = lookup(&var("LOGIN_PATH")) {
            config.routing.login_path = value;
        }
        if let Some(value) = lookup(&var("DENIED_PATH")) {
            config.routing.denied_path = value;
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<VmsConfig> {
    match format {
        ConfigFormat::Yaml => yaml_parse(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// YAML goes through the `config` crate's YAML source.
fn yaml_parse<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

/// Resolves `${VAR}` and `${VAR:default}` placeholders.
///
/// An unset variable without a default is left as written.
fn resolve_env_placeholders(content: &str) -> String {
    resolve_placeholders_with(content, |name| env::var(name).ok())
}

fn resolve_placeholders_with<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            result.push_str(&rest[start..]);
            return result;
        };

        let inner = &after[..end];
        let (name, default) = match inner.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (inner, None),
        };

        match (lookup(name), default) {
            (Some(value), _) => result.push_str(&value),
            (None, Some(default)) => result.push_str(default),
            (None, None) => {
                warn!("Environment variable '{}' not found", name);
                result.push_str(&rest[start..start + 2 + end + 1]);
            }
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    result
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "enabled"
    )
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
///
/// # Examples
///
/// ```no_run
/// use vms_config::loader::load_config;
///
/// let config = load_config("vms.yaml").unwrap();
/// ```
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<VmsConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<VmsConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================
