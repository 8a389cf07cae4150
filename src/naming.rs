//! Identifier and type-name conventions for emitted documents

use crate::config::TemplateConfig;
use crate::template::ParameterType;

/// Naming rules applied when emitting declaration and reference fragments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Naming {
    namespace: Option<String>,
}

impl Naming {
    /// Create naming rules with an optional logical id namespace
    pub fn new(namespace: Option<String>) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()),
        }
    }

    pub fn from_config(config: &TemplateConfig) -> Self {
        Self::new(config.namespace.clone())
    }

    /// Camelize a raw key: `allowed_values` becomes `AllowedValues`
    pub fn identifier(&self, raw: &str) -> String {
        camelize(raw)
    }

    /// The logical id of a named entity, including the namespace
    pub fn logical_id(&self, name: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}{}", camelize(ns), camelize(name)),
            None => camelize(name),
        }
    }

    /// The document spelling of a parameter type
    pub fn type_name(&self, ty: &ParameterType) -> String {
        match ty {
            ParameterType::String => "String".to_string(),
            ParameterType::Number => "Number".to_string(),
            ParameterType::NumberList => "List<Number>".to_string(),
            ParameterType::CommaDelimitedList => "CommaDelimitedList".to_string(),
            // Qualified names (`AWS::EC2::VPC::Id`, `List<...>`) are already in document form
            ParameterType::Other(name) if name.contains("::") || name.contains('<') => {
                name.clone()
            }
            ParameterType::Other(name) => camelize(name),
        }
    }
}

fn camelize(raw: &str) -> String {
    raw.split(|c: char| c == '_' || c == '-' || c == ':' || c.is_whitespace())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
