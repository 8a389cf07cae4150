//! Forward-reference handles
//!
//! A [`Handle`] exists from the first time its name is looked up. It starts
//! unbound and is bound to a body exactly once by `create`. Every read goes
//! through [`Handle::body`], so an unbound handle always reports
//! [`TemplateError::ReferenceMissing`] the same way.

use crate::error::TemplateError;
use crate::function::Fragment;
use crate::naming::Naming;

use super::entity::Entity;

#[derive(Debug, Clone)]
enum Binding<B> {
    Unbound,
    Bound(B),
}

/// A named slot for an entity body that may not exist yet
#[derive(Debug, Clone)]
pub struct Handle<B> {
    name: String,
    binding: Binding<B>,
}

impl<B: Entity> Handle<B> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binding: Binding::Unbound,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_created(&self) -> bool {
        matches!(self.binding, Binding::Bound(_))
    }

    /// The bound body, or `ReferenceMissing`
    pub fn body(&self) -> Result<&B, TemplateError> {
        match &self.binding {
            Binding::Bound(body) => Ok(body),
            Binding::Unbound => Err(TemplateError::missing(B::KIND, &self.name)),
        }
    }

    /// Bind `body`; a bound handle keeps its first body and reports `DuplicateDefinition`
    pub fn bind(&mut self, body: B) -> Result<&B, TemplateError> {
        if self.is_created() {
            return Err(TemplateError::duplicate(B::KIND, &self.name));
        }
        self.binding = Binding::Bound(body);
        self.body()
    }

    pub fn compile_declaration(&self, naming: &Naming) -> Result<Fragment, TemplateError> {
        Ok(self.body()?.declare(naming))
    }
}
