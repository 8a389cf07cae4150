//! TOML manifests describing a template declaratively
//!
//! ```toml
//! [template]
//! namespace = "App"
//!
//! [parameters.Env]
//! type = "String"
//! default = "dev"
//! default_condition = true
//!
//! [parameters.Env_prod]
//! inherit = "Env"
//! default = "prod"
//!
//! [conditions.IsProd]
//! expression = { "Fn::Equals" = [{ Ref = "Env" }, "prod"] }
//! ```
//!
//! Every key of a parameter entry other than `type`, `inherit` and
//! `default_condition` is passed through as a parameter option.
//!
//! A `{ Ref = "<name>" }` inside a condition expression names a manifest
//! parameter and is rewritten to that parameter's logical id, so the example
//! above emits `{ "Ref": "AppEnv" }`. Pseudo parameters such as
//! `AWS::Region` are left as written.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Map;
use thiserror::Error;

use crate::config::TemplateConfig;
use crate::error::{EntityKind, TemplateError};
use crate::function::Fragment;
use crate::template::{Options, ParameterOverrides, ParameterType, Template};
use crate::BuildError;

/// Errors that can occur when reading a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("parameter '{name}' needs either a `type` or an `inherit` parent")]
    MissingType { name: String },

    #[error("parameter '{name}' inherits from '{parent}', which is undefined or part of a cycle")]
    UnresolvedParent { name: String, parent: String },
}

/// One `[parameters.<name>]` table
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterEntry {
    #[serde(rename = "type")]
    pub ty: Option<ParameterType>,
    /// Spawn this parameter from another one
    pub inherit: Option<String>,
    /// Synthesize the `<name>_default` condition
    #[serde(default)]
    pub default_condition: bool,
    #[serde(flatten)]
    pub options: Options,
}

/// One `[conditions.<name>]` table
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionEntry {
    pub expression: Fragment,
}

/// A parsed manifest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterEntry>,
    #[serde(default)]
    pub conditions: BTreeMap<String, ConditionEntry>,
}

impl Manifest {
    /// Load a manifest from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a manifest from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    /// Bind every declared entity into a fresh template
    ///
    /// Parameters may inherit from entries declared later in the file;
    /// children are bound once their parent is.
    pub fn into_template(self) -> Result<Template, BuildError> {
        let mut template = Template::new(self.template);
        let mut with_default_condition = Vec::new();
        let mut pending: Vec<(String, ParameterEntry)> = self.parameters.into_iter().collect();

        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();

            for (name, entry) in pending {
                match entry.inherit.clone() {
                    None => {
                        let ty = entry
                            .ty
                            .clone()
                            .ok_or_else(|| ManifestError::MissingType { name: name.clone() })?;
                        template.parameter(&name).create(ty, entry.options.clone())?;
                    }
                    Some(parent) => {
                        let parent_ready = template
                            .find_parameter(&parent)
                            .is_some_and(|id| template.parameter_handle(id).is_created());
                        if !parent_ready {
                            deferred.push((name, entry));
                            continue;
                        }
                        let overrides = ParameterOverrides {
                            ty: entry.ty.clone(),
                            options: entry.options.clone(),
                        };
                        template.parameter(&parent).spawn(&name, overrides)?;
                    }
                }
                if entry.default_condition {
                    with_default_condition.push(name);
                }
            }

            if deferred.len() == before {
                let (name, entry) = deferred.swap_remove(0);
                return Err(ManifestError::UnresolvedParent {
                    name,
                    parent: entry.inherit.unwrap_or_default(),
                }
                .into());
            }
            pending = deferred;
        }

        for (name, entry) in self.conditions {
            let expression = resolve_references(&mut template, entry.expression)?;
            template.condition(&name).create(expression)?;
        }
        for name in with_default_condition {
            template.parameter(&name).default_condition()?;
        }

        Ok(template)
    }
}

/// Rewrite parameter `Ref`s in a condition expression through their handles
fn resolve_references(
    template: &mut Template,
    fragment: Fragment,
) -> Result<Fragment, TemplateError> {
    match fragment {
        Fragment::Object(object) => {
            if object.len() == 1 {
                if let Some(Fragment::String(name)) = object.get("Ref") {
                    if !name.contains("::") {
                        let id = template.find_parameter(name).ok_or_else(|| {
                            TemplateError::missing(EntityKind::Parameter, name.as_str())
                        })?;
                        return template.parameter_by_id(id).compile();
                    }
                }
            }
            object
                .into_iter()
                .map(|(key, value)| Ok((key, resolve_references(template, value)?)))
                .collect::<Result<Map<String, Fragment>, TemplateError>>()
                .map(Fragment::Object)
        }
        Fragment::Array(items) => items
            .into_iter()
            .map(|item| resolve_references(template, item))
            .collect::<Result<Vec<Fragment>, TemplateError>>()
            .map(Fragment::Array),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_parameter_entry() {
        let manifest = Manifest::from_str(
            r#"
[parameters.Env]
type = "String"
default = "dev"
allowed_values = ["dev", "prod"]
default_condition = true
"#,
        )
        .expect("Should parse");

        let env = &manifest.parameters["Env"];
        assert_eq!(env.ty, Some(ParameterType::String));
        assert!(env.default_condition);
        assert_eq!(
            Fragment::Object(env.options.clone()),
            json!({ "default": "dev", "allowed_values": ["dev", "prod"] })
        );
    }

    #[test]
    fn test_child_declared_before_parent() {
        let manifest = Manifest::from_str(
            r#"
[parameters.A_child]
inherit = "Z_parent"
default = 2

[parameters.Z_parent]
type = "Number"
default = 1
min_value = 0
"#,
        )
        .unwrap();

        let mut template = manifest.into_template().expect("Should build");
        let child = template.parameter("A_child");
        assert_eq!(child.ty().unwrap(), &ParameterType::Number);
        assert_eq!(
            Fragment::Object(child.options().unwrap().clone()),
            json!({ "default": 2, "min_value": 0 })
        );
    }

    #[test]
    fn test_missing_type() {
        let manifest = Manifest::from_str("[parameters.Env]\ndefault = \"dev\"\n").unwrap();
        let err = manifest.into_template().unwrap_err();
        assert!(matches!(
            err,
            BuildError::Manifest(ManifestError::MissingType { .. })
        ));
    }

    #[test]
    fn test_unknown_parent() {
        let manifest = Manifest::from_str("[parameters.Env]\ninherit = \"Nope\"\n").unwrap();
        let err = manifest.into_template().unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"parameter 'Env' inherits from 'Nope', which is undefined or part of a cycle"
        );
    }

    #[test]
    fn test_inheritance_cycle() {
        let manifest = Manifest::from_str(
            "[parameters.A]\ninherit = \"B\"\n[parameters.B]\ninherit = \"A\"\n",
        )
        .unwrap();
        let err = manifest.into_template().unwrap_err();
        assert!(matches!(
            err,
            BuildError::Manifest(ManifestError::UnresolvedParent { .. })
        ));
    }

    #[test]
    fn test_default_condition_without_default() {
        let manifest = Manifest::from_str(
            "[parameters.Name]\ntype = \"String\"\ndefault_condition = true\n",
        )
        .unwrap();
        let err = manifest.into_template().unwrap_err();
        assert!(matches!(
            err,
            BuildError::Template(TemplateError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_explicit_default_condition_is_reused() {
        let manifest = Manifest::from_str(
            r#"
[parameters.Env]
type = "String"
default = "dev"
default_condition = true

[conditions.Env_default]
expression = true
"#,
        )
        .unwrap();

        let mut template = manifest.into_template().unwrap();
        assert_eq!(
            template.condition("Env_default").compile_declaration().unwrap(),
            json!(true)
        );
    }

    #[test]
    fn test_condition_refs_follow_namespace() {
        let manifest = Manifest::from_str(
            r#"
[template]
namespace = "App"

[parameters.Env]
type = "String"

[conditions.IsProd]
expression = { "Fn::Equals" = [{ Ref = "Env" }, "prod"] }
"#,
        )
        .unwrap();

        let mut template = manifest.into_template().unwrap();
        assert_eq!(
            template.condition("IsProd").compile_declaration().unwrap(),
            json!({ "Fn::Equals": [{ "Ref": "AppEnv" }, "prod"] })
        );
        assert!(template.parameter("Env").referenced());
        assert!(template.unreferenced_parameters().is_empty());
    }

    #[test]
    fn test_condition_ref_to_undeclared_parameter() {
        let manifest = Manifest::from_str(
            r#"
[conditions.IsProd]
expression = { "Fn::Equals" = [{ Ref = "Stage" }, "prod"] }
"#,
        )
        .unwrap();

        let err = manifest.into_template().unwrap_err();
        assert!(matches!(
            err,
            BuildError::Template(TemplateError::ReferenceMissing {
                kind: EntityKind::Parameter,
                ..
            })
        ));
        assert_eq!(err.to_string(), "parameter 'Stage' has not been created");
    }

    #[test]
    fn test_pseudo_parameter_refs_pass_through() {
        let manifest = Manifest::from_str(
            r#"
[template]
namespace = "App"

[conditions.InUsEast]
expression = { "Fn::Equals" = [{ Ref = "AWS::Region" }, "us-east-1"] }
"#,
        )
        .unwrap();

        let mut template = manifest.into_template().unwrap();
        assert_eq!(
            template.condition("InUsEast").compile_declaration().unwrap(),
            json!({ "Fn::Equals": [{ "Ref": "AWS::Region" }, "us-east-1"] })
        );
    }
}
