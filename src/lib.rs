//! Tempest - template construction for declarative infrastructure documents
//!
//! This library lets callers declare named parameters and conditions, reference
//! them before or after they are defined, and compile everything into a
//! structured document tree.
//!
//! # Example
//!
//! ```rust
//! use tempest::build;
//!
//! let doc = build(r#"
//!     [parameters.Env]
//!     type = "String"
//!     default = "dev"
//!     default_condition = true
//! "#).unwrap();
//!
//! assert_eq!(doc["Parameters"]["Env"]["Default"], "dev");
//! assert!(doc["Conditions"]["EnvDefault"].is_object());
//! ```

pub mod config;
pub mod error;
pub mod function;
pub mod manifest;
pub mod naming;
pub mod template;

pub use config::{ConfigError, TemplateConfig};
pub use error::{EntityKind, TemplateError};
pub use function::{Fragment, Function};
pub use manifest::{Manifest, ManifestError};
pub use naming::Naming;
pub use template::{
    ConditionId, ConditionRef, Options, ParameterId, ParameterOverrides, ParameterRef,
    ParameterType, Template,
};

use std::path::Path;

use thiserror::Error;

/// Errors that can occur during the build pipeline
#[derive(Debug, Error)]
pub enum BuildError {
    /// Error reading or interpreting the manifest
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Error binding or compiling template entities
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Overrides applied on top of a manifest's `[template]` table
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// Replace the logical id namespace
    pub namespace: Option<String>,
    /// Replace the document description
    pub description: Option<String>,
}

impl BuildConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the namespace override
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the description override
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn apply(self, template: &mut TemplateConfig) {
        if let Some(namespace) = self.namespace {
            template.namespace = Some(namespace);
        }
        if let Some(description) = self.description {
            template.description = Some(description);
        }
    }
}

/// Build a manifest into a document tree with default configuration
pub fn build(source: &str) -> Result<Fragment, BuildError> {
    build_with_config(source, BuildConfig::default())
}

/// Build a manifest into a document tree with custom configuration
///
/// # Example
///
/// ```rust
/// use tempest::{build_with_config, BuildConfig};
///
/// let doc = build_with_config(
///     "[parameters.Env]\ntype = \"String\"\n",
///     BuildConfig::new().with_namespace("App"),
/// )
/// .unwrap();
///
/// assert!(doc["Parameters"]["AppEnv"].is_object());
/// ```
pub fn build_with_config(source: &str, config: BuildConfig) -> Result<Fragment, BuildError> {
    let manifest = Manifest::from_str(source)?;
    build_manifest(manifest, config)
}

/// Build a manifest file into a document tree
pub fn build_file(path: &Path, config: BuildConfig) -> Result<Fragment, BuildError> {
    let manifest = Manifest::from_file(path)?;
    build_manifest(manifest, config)
}

fn build_manifest(mut manifest: Manifest, config: BuildConfig) -> Result<Fragment, BuildError> {
    config.apply(&mut manifest.template);
    let template = manifest.into_template()?;
    Ok(template.to_fragment()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_build_empty_manifest() {
        let doc = build("").unwrap();
        assert_eq!(doc, json!({ "AWSTemplateFormatVersion": "2010-09-09" }));
    }

    #[test]
    fn test_build_parameters_and_conditions() {
        let doc = build(
            r#"
            [template]
            description = "web tier"

            [parameters.Env]
            type = "String"
            default = "dev"
            default_condition = true

            [conditions.IsProd]
            expression = { "Fn::Equals" = [{ Ref = "Env" }, "prod"] }
        "#,
        )
        .unwrap();

        assert_eq!(
            doc,
            json!({
                "AWSTemplateFormatVersion": "2010-09-09",
                "Description": "web tier",
                "Parameters": {
                    "Env": { "Type": "String", "Default": "dev" }
                },
                "Conditions": {
                    "IsProd": { "Fn::Equals": [{ "Ref": "Env" }, "prod"] },
                    "EnvDefault": { "Fn::Equals": [{ "Ref": "Env" }, "dev"] }
                }
            })
        );
    }

    #[test]
    fn test_config_overrides_manifest() {
        let doc = build_with_config(
            "[template]\nnamespace = \"Old\"\n[parameters.Env]\ntype = \"String\"\n",
            BuildConfig::new()
                .with_namespace("New")
                .with_description("override"),
        )
        .unwrap();
        assert!(doc["Parameters"]["NewEnv"].is_object());
        assert_eq!(doc["Description"], "override");
    }

    #[test]
    fn test_build_parse_error() {
        let result = build("this is not toml {{{{");
        assert!(matches!(
            result,
            Err(BuildError::Manifest(ManifestError::Parse(_)))
        ));
    }
}
