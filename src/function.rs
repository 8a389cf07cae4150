//! Intrinsic functions embedded in document fragments

use serde_json::{json, Map, Value};

/// An opaque, recursively nestable value of the output document
pub type Fragment = Value;

/// Intrinsic functions produced by handles
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    /// `Fn::If`: choose a branch by a named condition
    If {
        condition: String,
        truthy: Fragment,
        falsy: Fragment,
    },
    /// `Fn::Equals`
    Equals(Fragment, Fragment),
}

impl Function {
    pub fn equals(left: impl Into<Fragment>, right: impl Into<Fragment>) -> Self {
        Self::Equals(left.into(), right.into())
    }

    /// The document key naming this function
    pub fn key(&self) -> &'static str {
        match self {
            Function::If { .. } => "Fn::If",
            Function::Equals(..) => "Fn::Equals",
        }
    }

    pub fn compile(self) -> Fragment {
        let key = self.key();
        let args = match self {
            Function::If {
                condition,
                truthy,
                falsy,
            } => vec![Value::String(condition), truthy, falsy],
            Function::Equals(left, right) => vec![left, right],
        };
        let mut object = Map::new();
        object.insert(key.to_string(), Value::Array(args));
        Value::Object(object)
    }
}

impl From<Function> for Fragment {
    fn from(function: Function) -> Self {
        function.compile()
    }
}

/// A `{"Ref": id}` fragment
pub fn reference(logical_id: impl Into<String>) -> Fragment {
    json!({ "Ref": logical_id.into() })
}
