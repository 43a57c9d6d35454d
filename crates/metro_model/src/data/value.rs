//! Value and lookup directives.

use serde::{Deserialize, Serialize};

/// Instructions for constructing a value.
///
/// A value is either a literal (`value`) or compound, built from nested
/// `params`. `classname` names the type to construct and `method` an
/// optional static factory method on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueDirective {
    classname: Option<String>,
    method: Option<String>,
    value: Option<String>,
    params: Vec<ValueDirective>,
}

impl ValueDirective {
    /// Creates a literal value.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Creates a compound value from parameters.
    #[must_use]
    pub fn compound(params: Vec<ValueDirective>) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Sets the classname.
    #[must_use]
    pub fn with_classname(mut self, classname: impl Into<String>) -> Self {
        self.classname = Some(classname.into());
        self
    }

    /// Sets the factory method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Returns the classname.
    #[must_use]
    pub fn classname(&self) -> Option<&str> {
        self.classname.as_deref()
    }

    /// Returns the factory method.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Returns the literal value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the nested parameters.
    #[must_use]
    pub fn params(&self) -> &[ValueDirective] {
        &self.params
    }

    /// Returns `true` if the value is built from parameters.
    #[must_use]
    pub fn is_compound(&self) -> bool {
        !self.params.is_empty()
    }
}

/// Resolves a context entry by looking up a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupDirective {
    service: String,
}

impl LookupDirective {
    /// Creates a lookup for the given service classname.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Returns the service classname.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }
}
