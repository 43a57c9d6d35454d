//! Context directives.

use crate::composite::{Composite, PartReference};
use serde::{Deserialize, Serialize};

/// Keyed context entries supplied to a component at deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextDirective {
    classname: Option<String>,
    entries: Vec<PartReference>,
}

impl ContextDirective {
    /// Creates a context directive.
    #[must_use]
    pub fn new(classname: Option<String>, entries: Vec<PartReference>) -> Self {
        Self { classname, entries }
    }

    /// Returns the declared context implementation class.
    #[must_use]
    pub fn classname(&self) -> Option<&str> {
        self.classname.as_deref()
    }

    /// Returns `true` if there is no class and no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classname.is_none() && self.entries.is_empty()
    }
}

impl Composite for ContextDirective {
    fn part_references(&self) -> &[PartReference] {
        &self.entries
    }
}
