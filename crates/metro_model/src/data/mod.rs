//! Deployment directives.
//!
//! A directive is a declarative instruction consumed at deployment time to
//! configure a component instance. [`ComponentDirective`] is the root of a
//! tree: it names a component type (or a base directive it extends), sets
//! policies, and carries context entries and nested parts, each of which is
//! itself a [`Directive`].

mod categories;
mod component;
mod context;
mod value;

pub use categories::{CategoriesDirective, CategoryDirective, CategoryNode, ResolvedCategory};
pub use component::{ComponentDirective, ComponentDirectiveBuilder, is_uri};
pub use context::ContextDirective;
pub use value::{LookupDirective, ValueDirective};

use serde::{Deserialize, Serialize};

/// Any directive that can be held by a [`PartReference`](crate::PartReference).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Directive {
    /// A nested component.
    Component(Box<ComponentDirective>),
    /// A constructed value.
    Value(ValueDirective),
    /// A service lookup.
    Lookup(LookupDirective),
    /// A nested context.
    Context(ContextDirective),
}

impl Directive {
    /// Returns the component directive, if this is one.
    #[must_use]
    pub fn as_component(&self) -> Option<&ComponentDirective> {
        match self {
            Self::Component(component) => Some(component),
            _ => None,
        }
    }

    /// Returns the value directive, if this is one.
    #[must_use]
    pub fn as_value(&self) -> Option<&ValueDirective> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the lookup directive, if this is one.
    #[must_use]
    pub fn as_lookup(&self) -> Option<&LookupDirective> {
        match self {
            Self::Lookup(lookup) => Some(lookup),
            _ => None,
        }
    }

    /// Returns the context directive, if this is one.
    #[must_use]
    pub fn as_context(&self) -> Option<&ContextDirective> {
        match self {
            Self::Context(context) => Some(context),
            _ => None,
        }
    }
}

impl From<ComponentDirective> for Directive {
    fn from(directive: ComponentDirective) -> Self {
        Self::Component(Box::new(directive))
    }
}

impl From<ValueDirective> for Directive {
    fn from(directive: ValueDirective) -> Self {
        Self::Value(directive)
    }
}

impl From<LookupDirective> for Directive {
    fn from(directive: LookupDirective) -> Self {
        Self::Lookup(directive)
    }
}

impl From<ContextDirective> for Directive {
    fn from(directive: ContextDirective) -> Self {
        Self::Context(directive)
    }
}
