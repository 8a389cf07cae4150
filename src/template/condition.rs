//! Conditions: named boolean expressions consumed only through `Fn::If`

use crate::error::{EntityKind, TemplateError};
use crate::function::Fragment;
use crate::naming::Naming;

use super::binding::Handle;
use super::entity::Entity;
use super::registry::{ConditionId, Template};

/// A bound condition
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionBody {
    name: String,
    expression: Fragment,
}

impl ConditionBody {
    pub fn new(name: impl Into<String>, expression: impl Into<Fragment>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
        }
    }

    pub fn expression(&self) -> &Fragment {
        &self.expression
    }
}

impl Entity for ConditionBody {
    const KIND: EntityKind = EntityKind::Condition;

    fn name(&self) -> &str {
        &self.name
    }

    fn declare(&self, _naming: &Naming) -> Fragment {
        self.expression.clone()
    }

    fn reference(&self, _naming: &Naming) -> Result<Fragment, TemplateError> {
        Err(TemplateError::condition_reference(&self.name))
    }
}

pub type ConditionHandle = Handle<ConditionBody>;

/// A view of one condition handle inside its template
#[derive(Debug)]
pub struct ConditionRef<'a> {
    template: &'a mut Template,
    id: ConditionId,
}

impl<'a> ConditionRef<'a> {
    pub(crate) fn new(template: &'a mut Template, id: ConditionId) -> Self {
        Self { template, id }
    }

    fn handle(&self) -> &ConditionHandle {
        self.template.condition_handle(self.id)
    }

    pub fn id(&self) -> ConditionId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.handle().name()
    }

    pub fn is_created(&self) -> bool {
        self.handle().is_created()
    }

    /// Bind the condition to a boolean-valued expression
    pub fn create(mut self, expression: impl Into<Fragment>) -> Result<Self, TemplateError> {
        let handle = self.template.condition_handle_mut(self.id);
        let body = ConditionBody::new(handle.name(), expression);
        handle.bind(body)?;
        tracing::debug!(condition = %handle.name(), "created condition");
        Ok(self)
    }

    pub fn expression(&self) -> Result<&Fragment, TemplateError> {
        Ok(self.handle().body()?.expression())
    }

    /// Always fails: conditions have no value form
    pub fn compile(&self) -> Result<Fragment, TemplateError> {
        match self.handle().body() {
            Ok(body) => body.reference(self.template.naming()),
            Err(_) => Err(TemplateError::condition_reference(self.name())),
        }
    }

    pub fn compile_declaration(&self) -> Result<Fragment, TemplateError> {
        self.handle().compile_declaration(self.template.naming())
    }

    /// `Fn::If` on this condition
    pub fn if_(
        &self,
        truthy: impl Into<Fragment>,
        falsy: impl Into<Fragment>,
    ) -> Result<Fragment, TemplateError> {
        let body = self.handle().body()?;
        Ok(body.branch(self.template.naming(), truthy.into(), falsy.into()))
    }
}
