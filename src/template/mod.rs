//! Named entities with forward references
//!
//! This module provides the handles a template is built from. A handle can be
//! looked up by name before its entity is defined, bound exactly once with
//! `create`, and then compiled into either its declaration (emitted once) or
//! its reference form (emitted wherever it is used).
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tempest::template::{Options, ParameterType, Template};
//!
//! let mut tmpl = Template::default();
//!
//! // Reference the condition before it exists
//! let is_prod = tmpl.lookup_condition("IsProd");
//!
//! let mut env = tmpl
//!     .parameter("Env")
//!     .create(ParameterType::String, Options::new())
//!     .unwrap();
//! let env_ref = env.compile().unwrap();
//!
//! tmpl.condition_by_id(is_prod)
//!     .create(json!({ "Fn::Equals": [env_ref, "prod"] }))
//!     .unwrap();
//! assert!(tmpl.condition("IsProd").is_created());
//! ```

mod binding;
mod condition;
mod entity;
mod parameter;
mod registry;

pub use binding::Handle;
pub use condition::{ConditionBody, ConditionHandle, ConditionRef};
pub use entity::Entity;
pub use parameter::{
    Options, ParameterBody, ParameterHandle, ParameterOverrides, ParameterRef, ParameterType,
    DEFAULT_CONDITION_SUFFIX, DEFAULT_OPTION,
};
pub use registry::{ConditionId, ParameterId, Template};
