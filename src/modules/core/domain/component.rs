//! User-declared components as parsed, before registry validation

use serde_yaml::{Mapping, Value};

/// A receiver or processor as written in the configuration document.
///
/// Parameters stay untyped until the validator has checked them against the
/// registry; declaration order of the parameters is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Unique ID within its role and section
    pub id: String,

    /// Value of the `type` discriminator
    pub type_name: String,

    /// Remaining type-specific parameters
    pub params: Mapping,
}

impl Component {
    /// Create a component with no parameters
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            params: Mapping::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(Value::String(name.into()), value.into());
        self
    }

    /// Look up a parameter by name
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Parameter names in declaration order.
    ///
    /// Non-string keys are reported with their YAML rendering so they can be
    /// named in error messages.
    pub fn param_names(&self) -> Vec<String> {
        self.params
            .keys()
            .map(|k| match k {
                Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
            })
            .collect()
    }
}
