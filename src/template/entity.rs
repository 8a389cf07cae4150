//! The capability shared by every declarable entity kind

use crate::error::{EntityKind, TemplateError};
use crate::function::{Fragment, Function};
use crate::naming::Naming;

/// A bound entity body: something that can be declared once and consumed elsewhere
pub trait Entity {
    const KIND: EntityKind;

    fn name(&self) -> &str;

    /// The full definition, emitted once at the entity's declaration site
    fn declare(&self, naming: &Naming) -> Fragment;

    /// The value form, emitted wherever the entity is used
    fn reference(&self, naming: &Naming) -> Result<Fragment, TemplateError>;

    /// An `Fn::If` keyed by this entity's logical id
    fn branch(&self, naming: &Naming, truthy: Fragment, falsy: Fragment) -> Fragment {
        Function::If {
            condition: naming.logical_id(self.name()),
            truthy,
            falsy,
        }
        .into()
    }
}
