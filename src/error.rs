//! Error types for template construction

use std::fmt;

use thiserror::Error;

/// The two kinds of named entity a template can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Parameter,
    Condition,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Parameter => f.write_str("parameter"),
            EntityKind::Condition => f.write_str("condition"),
        }
    }
}

/// Errors raised by handle operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A handle was read before `create` bound a body to it
    #[error("{kind} '{name}' has not been created")]
    ReferenceMissing { kind: EntityKind, name: String },

    /// `create` was called on a handle that is already bound
    #[error("{kind} '{name}' has already been created")]
    DuplicateDefinition { kind: EntityKind, name: String },

    /// An entity was consumed in a way its kind does not allow
    #[error("invalid use of '{name}': {message}")]
    Usage { name: String, message: String },

    /// A caller contract was broken
    #[error("precondition violated for '{name}': {message}")]
    PreconditionViolation { name: String, message: String },

    /// Two distinct names map to the same logical id in one document section
    #[error("{kind} '{name}' and '{existing}' both compile to logical id '{logical_id}'")]
    LogicalIdCollision {
        kind: EntityKind,
        logical_id: String,
        name: String,
        existing: String,
    },
}

impl TemplateError {
    pub fn missing(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::ReferenceMissing {
            kind,
            name: name.into(),
        }
    }

    pub fn duplicate(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            kind,
            name: name.into(),
        }
    }

    /// Conditions have no value form; they are only consumable through `Fn::If`
    pub fn condition_reference(name: impl Into<String>) -> Self {
        Self::Usage {
            name: name.into(),
            message: "cannot reference a condition directly, branch on it with `Fn::If` instead"
                .to_string(),
        }
    }

    pub fn precondition(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PreconditionViolation {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn collision(
        kind: EntityKind,
        logical_id: impl Into<String>,
        name: impl Into<String>,
        existing: impl Into<String>,
    ) -> Self {
        Self::LogicalIdCollision {
            kind,
            logical_id: logical_id.into(),
            name: name.into(),
            existing: existing.into(),
        }
    }

    /// Name of the entity the error is about
    pub fn name(&self) -> &str {
        match self {
            Self::ReferenceMissing { name, .. }
            | Self::DuplicateDefinition { name, .. }
            | Self::Usage { name, .. }
            | Self::PreconditionViolation { name, .. }
            | Self::LogicalIdCollision { name, .. } => name,
        }
    }
}
