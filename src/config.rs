//! Configuration for template construction

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Format version stamped on every document unless overridden
pub const DEFAULT_FORMAT_VERSION: &str = "2010-09-09";

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Template-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Prefix applied to every logical id (e.g. "App" turns `Env` into `AppEnv`)
    pub namespace: Option<String>,

    /// Value of the `AWSTemplateFormatVersion` key
    pub format_version: String,

    /// Optional document description
    pub description: Option<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            format_version: DEFAULT_FORMAT_VERSION.to_string(),
            description: None,
        }
    }
}

impl TemplateConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the logical id namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the format version
    pub fn with_format_version(mut self, version: impl Into<String>) -> Self {
        self.format_version = version.into();
        self
    }

    /// Set the document description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TemplateConfig::default();
        assert_eq!(config.namespace, None);
        assert_eq!(config.format_version, "2010-09-09");
        assert_eq!(config.description, None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TemplateConfig::new()
            .with_namespace("App")
            .with_format_version("2099-01-01")
            .with_description("network stack");

        assert_eq!(config.namespace.as_deref(), Some("App"));
        assert_eq!(config.format_version, "2099-01-01");
        assert_eq!(config.description.as_deref(), Some("network stack"));
    }

    #[test]
    fn test_parse_toml_partial() {
        let config = TemplateConfig::from_str(r#"namespace = "Web""#).expect("Should parse");
        assert_eq!(config.namespace.as_deref(), Some("Web"));
        assert_eq!(config.format_version, DEFAULT_FORMAT_VERSION);
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = TemplateConfig::from_str("namespace = {{{{");
        assert!(result.is_err());
    }
}
