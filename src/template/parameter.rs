//! Parameters: typed inputs referenced by `Ref`
//!
//! A parameter handle can also be *spawned* into a child parameter that
//! inherits its type and options, and can synthesize a `<name>_default`
//! condition testing whether the parameter still holds its default value.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Map;

use crate::error::{EntityKind, TemplateError};
use crate::function::{reference, Fragment, Function};
use crate::naming::Naming;

use super::binding::Handle;
use super::condition::{ConditionBody, ConditionRef};
use super::entity::Entity;
use super::registry::{ParameterId, Template};

/// Parameter options keyed by their snake_case name
pub type Options = Map<String, Fragment>;

/// Reserved option holding the parameter's default value
pub const DEFAULT_OPTION: &str = "default";

/// Suffix of the synthesized "still at default" condition
pub const DEFAULT_CONDITION_SUFFIX: &str = "default";

/// Semantic type of a parameter value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ParameterType {
    String,
    Number,
    NumberList,
    CommaDelimitedList,
    /// Any other type, e.g. `AWS::EC2::KeyPair::KeyName`
    Other(String),
}

impl FromStr for ParameterType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Ok(match normalized.as_str() {
            "string" => ParameterType::String,
            "number" => ParameterType::Number,
            "numberlist" | "list<number>" => ParameterType::NumberList,
            "commadelimitedlist" => ParameterType::CommaDelimitedList,
            _ => ParameterType::Other(s.to_string()),
        })
    }
}

impl From<&str> for ParameterType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(ty) => ty,
            Err(never) => match never {},
        }
    }
}

impl From<String> for ParameterType {
    fn from(s: String) -> Self {
        ParameterType::from(s.as_str())
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Naming::default().type_name(self))
    }
}

/// A bound parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBody {
    name: String,
    ty: ParameterType,
    options: Options,
}

impl ParameterBody {
    pub fn new(name: impl Into<String>, ty: ParameterType, options: Options) -> Self {
        Self {
            name: name.into(),
            ty,
            options,
        }
    }

    pub fn ty(&self) -> &ParameterType {
        &self.ty
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn default_value(&self) -> Option<&Fragment> {
        self.options.get(DEFAULT_OPTION)
    }

    /// `Fn::Equals` between this parameter's `Ref` and its default value
    pub fn default_equality(&self, naming: &Naming) -> Result<Fragment, TemplateError> {
        let default = self.default_value().ok_or_else(|| {
            TemplateError::precondition(&self.name, "parameter has no `default` option")
        })?;
        Ok(Function::equals(self.reference(naming)?, default.clone()).into())
    }
}

impl Entity for ParameterBody {
    const KIND: EntityKind = EntityKind::Parameter;

    fn name(&self) -> &str {
        &self.name
    }

    fn declare(&self, naming: &Naming) -> Fragment {
        let mut declaration = Map::new();
        declaration.insert("Type".to_string(), naming.type_name(&self.ty).into());
        for (key, value) in &self.options {
            declaration.insert(naming.identifier(key), value.clone());
        }
        Fragment::Object(declaration)
    }

    fn reference(&self, naming: &Naming) -> Result<Fragment, TemplateError> {
        Ok(reference(naming.logical_id(&self.name)))
    }
}

/// What a spawned parameter changes relative to its parent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterOverrides {
    pub ty: Option<ParameterType>,
    pub options: Options,
}

impl ParameterOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, ty: impl Into<ParameterType>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Fragment>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_default(self, value: impl Into<Fragment>) -> Self {
        self.with_option(DEFAULT_OPTION, value)
    }
}

impl From<Options> for ParameterOverrides {
    fn from(options: Options) -> Self {
        Self { ty: None, options }
    }
}

/// Registry entry for one parameter name
#[derive(Debug, Clone)]
pub struct ParameterHandle {
    pub(crate) handle: Handle<ParameterBody>,
    pub(crate) parent: Option<ParameterId>,
    pub(crate) referenced: bool,
}

impl ParameterHandle {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            handle: Handle::new(name),
            parent: None,
            referenced: false,
        }
    }

    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn is_created(&self) -> bool {
        self.handle.is_created()
    }

    pub fn body(&self) -> Result<&ParameterBody, TemplateError> {
        self.handle.body()
    }

    pub fn parent(&self) -> Option<ParameterId> {
        self.parent
    }

    pub fn referenced(&self) -> bool {
        self.referenced
    }
}

/// A view of one parameter handle inside its template
#[derive(Debug)]
pub struct ParameterRef<'a> {
    template: &'a mut Template,
    id: ParameterId,
}

impl<'a> ParameterRef<'a> {
    pub(crate) fn new(template: &'a mut Template, id: ParameterId) -> Self {
        Self { template, id }
    }

    fn entry(&self) -> &ParameterHandle {
        self.template.parameter_handle(self.id)
    }

    fn body(&self) -> Result<&ParameterBody, TemplateError> {
        self.entry().body()
    }

    pub fn id(&self) -> ParameterId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.entry().name()
    }

    pub fn is_created(&self) -> bool {
        self.entry().is_created()
    }

    /// Whether a `Ref` to this parameter has been emitted
    pub fn referenced(&self) -> bool {
        self.entry().referenced()
    }

    /// The parent this handle inherits from, if it was spawned
    pub fn parent(&self) -> Option<ParameterId> {
        self.entry().parent()
    }

    pub fn ty(&self) -> Result<&ParameterType, TemplateError> {
        Ok(self.body()?.ty())
    }

    pub fn options(&self) -> Result<&Options, TemplateError> {
        Ok(self.body()?.options())
    }

    /// Bind the parameter to a type and options
    pub fn create(
        mut self,
        ty: impl Into<ParameterType>,
        options: Options,
    ) -> Result<Self, TemplateError> {
        let entry = self.template.parameter_handle_mut(self.id);
        let body = ParameterBody::new(entry.name(), ty.into(), options);
        entry.handle.bind(body)?;
        tracing::debug!(parameter = %entry.name(), "created parameter");
        Ok(self)
    }

    /// Bind a spawned parameter from its parent's current type and options
    pub fn create_inherited(
        self,
        overrides: impl Into<ParameterOverrides>,
    ) -> Result<Self, TemplateError> {
        if self.is_created() {
            return Err(TemplateError::duplicate(EntityKind::Parameter, self.name()));
        }
        let overrides = overrides.into();
        let parent_id = self.parent().ok_or_else(|| {
            TemplateError::precondition(self.name(), "parameter has no parent to inherit from")
        })?;
        let parent = self.template.parameter_handle(parent_id).body()?;

        let ty = overrides.ty.unwrap_or_else(|| parent.ty().clone());
        let mut options = parent.options().clone();
        options.extend(overrides.options);

        self.create(ty, options)
    }

    /// The `Ref` fragment; marks the parameter as referenced
    pub fn compile(&mut self) -> Result<Fragment, TemplateError> {
        let fragment = self.body()?.reference(self.template.naming())?;
        self.template.parameter_handle_mut(self.id).referenced = true;
        Ok(fragment)
    }

    pub fn compile_declaration(&self) -> Result<Fragment, TemplateError> {
        self.entry()
            .handle
            .compile_declaration(self.template.naming())
    }

    /// Create a child parameter named `name` that inherits from this one
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        overrides: impl Into<ParameterOverrides>,
    ) -> Result<ParameterRef<'_>, TemplateError> {
        self.body()?;
        let name = name.into();
        let child = self.template.inherit_parameter(&name, self.id);
        tracing::debug!(parent = %self.name(), child = %name, "spawning parameter");
        self.template
            .parameter_by_id(child)
            .create_inherited(overrides)
    }

    /// Spawn `<prefix>_<name>`
    pub fn with_prefix(
        &mut self,
        prefix: &str,
        overrides: impl Into<ParameterOverrides>,
    ) -> Result<ParameterRef<'_>, TemplateError> {
        let name = format!("{}_{}", prefix, self.name());
        self.spawn(name, overrides)
    }

    /// Spawn `<name>_<suffix>`
    pub fn with_suffix(
        &mut self,
        suffix: &str,
        overrides: impl Into<ParameterOverrides>,
    ) -> Result<ParameterRef<'_>, TemplateError> {
        let name = format!("{}_{}", self.name(), suffix);
        self.spawn(name, overrides)
    }

    /// The `<name>_default` condition, created on first use
    ///
    /// A condition already bound under that name is returned as is.
    pub fn default_condition(&mut self) -> Result<ConditionRef<'_>, TemplateError> {
        let body = self.body()?;
        let name = format!("{}_{}", body.name(), DEFAULT_CONDITION_SUFFIX);
        let cond = self.template.lookup_condition(&name);

        if !self.template.condition_handle(cond).is_created() {
            let equality = self.body()?.default_equality(self.template.naming())?;
            self.template
                .condition_handle_mut(cond)
                .bind(ConditionBody::new(&name, equality))?;
            // The equality embeds this parameter's `Ref`
            self.template.parameter_handle_mut(self.id).referenced = true;
            tracing::debug!(condition = %name, "synthesized default condition");
        }

        Ok(self.template.condition_by_id(cond))
    }

    /// `Fn::If` on the default condition
    pub fn if_(
        &mut self,
        truthy: impl Into<Fragment>,
        falsy: impl Into<Fragment>,
    ) -> Result<Fragment, TemplateError> {
        let (truthy, falsy) = (truthy.into(), falsy.into());
        self.default_condition()?.if_(truthy, falsy)
    }

    /// `truthy` while the parameter holds its default, otherwise `falsy`
    /// (this parameter's own `Ref` when `None`)
    pub fn if_default(
        &mut self,
        truthy: impl Into<Fragment>,
        falsy: Option<Fragment>,
    ) -> Result<Fragment, TemplateError> {
        let cond = self.default_condition()?.id();
        let falsy = match falsy {
            Some(falsy) => falsy,
            None => self.compile()?,
        };
        self.template.condition_by_id(cond).if_(truthy, falsy)
    }
}
