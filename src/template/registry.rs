//! The template: owner of every parameter and condition handle

use std::collections::HashMap;

use serde_json::Map;

use crate::config::TemplateConfig;
use crate::error::{EntityKind, TemplateError};
use crate::function::Fragment;
use crate::naming::Naming;

use super::condition::{ConditionHandle, ConditionRef};
use super::parameter::{ParameterHandle, ParameterRef};

/// Stable identity of a parameter handle within its template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterId(usize);

/// Stable identity of a condition handle within its template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionId(usize);

/// Handles keyed by name, one namespace per entity kind
///
/// A template is built once per document: handles are looked up (and
/// allocated unbound on first use), bound with `create`, and finally
/// compiled into declaration sections.
#[derive(Debug)]
pub struct Template {
    config: TemplateConfig,
    naming: Naming,
    parameters: Vec<ParameterHandle>,
    parameter_ids: HashMap<String, ParameterId>,
    conditions: Vec<ConditionHandle>,
    condition_ids: HashMap<String, ConditionId>,
}

impl Default for Template {
    fn default() -> Self {
        Self::new(TemplateConfig::default())
    }
}

impl Template {
    pub fn new(config: TemplateConfig) -> Self {
        Self {
            naming: Naming::from_config(&config),
            config,
            parameters: Vec::new(),
            parameter_ids: HashMap::new(),
            conditions: Vec::new(),
            condition_ids: HashMap::new(),
        }
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    pub fn naming(&self) -> &Naming {
        &self.naming
    }

    /// Id of the parameter named `name`, allocating an unbound handle if absent
    pub fn lookup_parameter(&mut self, name: &str) -> ParameterId {
        if let Some(id) = self.parameter_ids.get(name) {
            return *id;
        }
        let id = ParameterId(self.parameters.len());
        self.parameters.push(ParameterHandle::new(name));
        self.parameter_ids.insert(name.to_string(), id);
        id
    }

    /// Id of the condition named `name`, allocating an unbound handle if absent
    pub fn lookup_condition(&mut self, name: &str) -> ConditionId {
        if let Some(id) = self.condition_ids.get(name) {
            return *id;
        }
        let id = ConditionId(self.conditions.len());
        self.conditions.push(ConditionHandle::new(name));
        self.condition_ids.insert(name.to_string(), id);
        id
    }

    pub fn find_parameter(&self, name: &str) -> Option<ParameterId> {
        self.parameter_ids.get(name).copied()
    }

    pub fn find_condition(&self, name: &str) -> Option<ConditionId> {
        self.condition_ids.get(name).copied()
    }

    pub fn parameter(&mut self, name: &str) -> ParameterRef<'_> {
        let id = self.lookup_parameter(name);
        ParameterRef::new(self, id)
    }

    pub fn condition(&mut self, name: &str) -> ConditionRef<'_> {
        let id = self.lookup_condition(name);
        ConditionRef::new(self, id)
    }

    pub fn parameter_by_id(&mut self, id: ParameterId) -> ParameterRef<'_> {
        ParameterRef::new(self, id)
    }

    pub fn condition_by_id(&mut self, id: ConditionId) -> ConditionRef<'_> {
        ConditionRef::new(self, id)
    }

    /// Allocate or fetch `name` as a child of `parent`
    ///
    /// The parent link is only rewired while the handle is unbound; a bound
    /// handle keeps its body and the subsequent `create` reports the duplicate.
    pub fn inherit_parameter(&mut self, name: &str, parent: ParameterId) -> ParameterId {
        let id = self.lookup_parameter(name);
        let entry = self.parameter_handle_mut(id);
        if !entry.is_created() {
            entry.parent = Some(parent);
        }
        id
    }

    pub(crate) fn parameter_handle(&self, id: ParameterId) -> &ParameterHandle {
        &self.parameters[id.0]
    }

    pub(crate) fn parameter_handle_mut(&mut self, id: ParameterId) -> &mut ParameterHandle {
        &mut self.parameters[id.0]
    }

    pub(crate) fn condition_handle(&self, id: ConditionId) -> &ConditionHandle {
        &self.conditions[id.0]
    }

    pub(crate) fn condition_handle_mut(&mut self, id: ConditionId) -> &mut ConditionHandle {
        &mut self.conditions[id.0]
    }

    /// All parameter handles in allocation order
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterHandle> {
        self.parameters.iter()
    }

    /// All condition handles in allocation order
    pub fn conditions(&self) -> impl Iterator<Item = &ConditionHandle> {
        self.conditions.iter()
    }

    /// Names of bound parameters no `Ref` was ever emitted for
    pub fn unreferenced_parameters(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.is_created() && !p.referenced())
            .map(|p| p.name())
            .collect()
    }

    /// The `Parameters` section: one declaration per bound parameter
    ///
    /// Fails when two bound parameters compile to the same logical id.
    pub fn compile_parameters(&self) -> Result<Map<String, Fragment>, TemplateError> {
        let mut section = Section::new(EntityKind::Parameter);
        for entry in &self.parameters {
            match entry.handle.compile_declaration(&self.naming) {
                Ok(declaration) => {
                    section.insert(self.naming.logical_id(entry.name()), entry.name(), declaration)?
                }
                Err(_) => {
                    tracing::debug!(parameter = %entry.name(), "skipping parameter that was never created");
                }
            }
        }
        Ok(section.declarations)
    }

    /// The `Conditions` section: one declaration per bound condition
    ///
    /// Fails when two bound conditions compile to the same logical id.
    pub fn compile_conditions(&self) -> Result<Map<String, Fragment>, TemplateError> {
        let mut section = Section::new(EntityKind::Condition);
        for handle in &self.conditions {
            match handle.compile_declaration(&self.naming) {
                Ok(declaration) => {
                    section.insert(self.naming.logical_id(handle.name()), handle.name(), declaration)?
                }
                Err(_) => {
                    tracing::debug!(condition = %handle.name(), "skipping condition that was never created");
                }
            }
        }
        Ok(section.declarations)
    }

    /// Assemble the document tree; empty sections are omitted
    pub fn to_fragment(&self) -> Result<Fragment, TemplateError> {
        for name in self.unreferenced_parameters() {
            tracing::warn!(parameter = %name, "parameter is declared but never referenced");
        }

        let mut document = Map::new();
        document.insert(
            "AWSTemplateFormatVersion".to_string(),
            self.config.format_version.clone().into(),
        );
        if let Some(description) = &self.config.description {
            document.insert("Description".to_string(), description.clone().into());
        }

        let parameters = self.compile_parameters()?;
        if !parameters.is_empty() {
            document.insert("Parameters".to_string(), Fragment::Object(parameters));
        }
        let conditions = self.compile_conditions()?;
        if !conditions.is_empty() {
            document.insert("Conditions".to_string(), Fragment::Object(conditions));
        }

        Ok(Fragment::Object(document))
    }
}

/// One document section under construction, remembering which name owns each key
struct Section<'a> {
    kind: EntityKind,
    declarations: Map<String, Fragment>,
    owners: HashMap<String, &'a str>,
}

impl<'a> Section<'a> {
    fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            declarations: Map::new(),
            owners: HashMap::new(),
        }
    }

    fn insert(
        &mut self,
        logical_id: String,
        name: &'a str,
        declaration: Fragment,
    ) -> Result<(), TemplateError> {
        if let Some(existing) = self.owners.get(&logical_id) {
            return Err(TemplateError::collision(
                self.kind,
                logical_id,
                name,
                *existing,
            ));
        }
        self.owners.insert(logical_id.clone(), name);
        self.declarations.insert(logical_id, declaration);
        Ok(())
    }
}
