//! Component directives.

use super::{CategoriesDirective, ContextDirective};
use crate::composite::{Composite, PartReference};
use crate::error::DirectiveError;
use crate::policy::{ActivationPolicy, CollectionPolicy, LifestylePolicy};
use serde::{Deserialize, Serialize};

/// Deployment instructions for one component.
///
/// A directive names either the component implementation class or the URI
/// of a base directive it extends, never both. Policies left unset defer to
/// the component type's own declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentDirective {
    name: Option<String>,
    classname: Option<String>,
    base: Option<String>,
    activation: Option<ActivationPolicy>,
    collection: Option<CollectionPolicy>,
    lifestyle: Option<LifestylePolicy>,
    categories: Option<CategoriesDirective>,
    context: ContextDirective,
    parts: Vec<PartReference>,
}

impl ComponentDirective {
    /// Creates a directive for an implementation class.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::MissingType`] if `classname` is empty.
    pub fn new(name: Option<&str>, classname: &str) -> Result<Self, DirectiveError> {
        let mut builder = Self::builder().classname(classname);
        if let Some(name) = name {
            builder = builder.name(name);
        }
        builder.build()
    }

    /// Starts building a directive.
    #[must_use]
    pub fn builder() -> ComponentDirectiveBuilder {
        ComponentDirectiveBuilder::default()
    }

    /// Returns the instance name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the implementation classname.
    #[must_use]
    pub fn classname(&self) -> Option<&str> {
        self.classname.as_deref()
    }

    /// Returns the URI of the base directive.
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Returns the activation policy override.
    #[must_use]
    pub fn activation(&self) -> Option<ActivationPolicy> {
        self.activation
    }

    /// Returns the collection policy override.
    #[must_use]
    pub fn collection(&self) -> Option<CollectionPolicy> {
        self.collection
    }

    /// Returns the lifestyle policy override.
    #[must_use]
    pub fn lifestyle(&self) -> Option<LifestylePolicy> {
        self.lifestyle
    }

    /// Returns the logging categories.
    #[must_use]
    pub fn categories(&self) -> Option<&CategoriesDirective> {
        self.categories.as_ref()
    }

    /// Returns the context directive.
    #[must_use]
    pub fn context(&self) -> &ContextDirective {
        &self.context
    }
}

impl Composite for ComponentDirective {
    fn part_references(&self) -> &[PartReference] {
        &self.parts
    }
}

/// Builder for [`ComponentDirective`].
#[derive(Debug, Clone, Default)]
pub struct ComponentDirectiveBuilder {
    name: Option<String>,
    classname: Option<String>,
    base: Option<String>,
    activation: Option<ActivationPolicy>,
    collection: Option<CollectionPolicy>,
    lifestyle: Option<LifestylePolicy>,
    categories: Option<CategoriesDirective>,
    context: ContextDirective,
    parts: Vec<PartReference>,
}

impl ComponentDirectiveBuilder {
    /// Sets the instance name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the implementation classname.
    #[must_use]
    pub fn classname(mut self, classname: impl Into<String>) -> Self {
        self.classname = Some(classname.into());
        self
    }

    /// Sets the base directive URI.
    #[must_use]
    pub fn base(mut self, uri: impl Into<String>) -> Self {
        self.base = Some(uri.into());
        self
    }

    /// Sets the activation policy.
    #[must_use]
    pub fn activation(mut self, policy: ActivationPolicy) -> Self {
        self.activation = Some(policy);
        self
    }

    /// Sets the collection policy.
    #[must_use]
    pub fn collection(mut self, policy: CollectionPolicy) -> Self {
        self.collection = Some(policy);
        self
    }

    /// Sets the lifestyle policy.
    #[must_use]
    pub fn lifestyle(mut self, policy: LifestylePolicy) -> Self {
        self.lifestyle = Some(policy);
        self
    }

    /// Sets the logging categories.
    #[must_use]
    pub fn categories(mut self, categories: CategoriesDirective) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Sets the context directive.
    #[must_use]
    pub fn context(mut self, context: ContextDirective) -> Self {
        self.context = context;
        self
    }

    /// Appends a part.
    #[must_use]
    pub fn part(mut self, part: PartReference) -> Self {
        self.parts.push(part);
        self
    }

    /// Replaces all parts.
    #[must_use]
    pub fn parts(mut self, parts: Vec<PartReference>) -> Self {
        self.parts = parts;
        self
    }

    /// Builds the directive.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::BaseOverride`] if both a classname and a
    /// base are set, [`DirectiveError::MissingType`] if neither is, or
    /// [`DirectiveError::InvalidBase`] if the base is not an absolute URI.
    pub fn build(self) -> Result<ComponentDirective, DirectiveError> {
        let classname = self.classname.filter(|classname| !classname.is_empty());
        let base = self.base.filter(|base| !base.is_empty());
        match (&classname, &base) {
            (Some(_), Some(_)) => return Err(DirectiveError::BaseOverride),
            (None, None) => return Err(DirectiveError::MissingType),
            (None, Some(base)) if !is_uri(base) => return Err(DirectiveError::InvalidBase(base.clone())),
            _ => {}
        }
        Ok(ComponentDirective {
            name: self.name,
            classname,
            base,
            activation: self.activation,
            collection: self.collection,
            lifestyle: self.lifestyle,
            categories: self.categories,
            context: self.context,
            parts: self.parts,
        })
    }
}

/// Returns `true` if `value` is an absolute URI: a scheme starting with a
/// letter, a colon, and a non-empty remainder.
#[must_use]
pub fn is_uri(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && !rest.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_and_base_are_exclusive() {
        let both = ComponentDirective::builder()
            .classname("acme.Widget")
            .base("link:part:acme/widget")
            .build();
        assert_eq!(both, Err(DirectiveError::BaseOverride));

        let neither = ComponentDirective::builder().name("w").build();
        assert_eq!(neither, Err(DirectiveError::MissingType));
    }

    #[test]
    fn recognizes_uri_schemes() {
        assert!(is_uri("link:part:acme/widget"));
        assert!(is_uri("file:/tmp/widget.xml"));
        assert!(!is_uri("widget.xml"));
        assert!(!is_uri("1abc:rest"));
        assert!(!is_uri("acme:"));
    }

    #[test]
    fn base_must_be_a_uri() {
        let relative = ComponentDirective::builder().base("widget.xml").build();
        assert_eq!(relative, Err(DirectiveError::InvalidBase("widget.xml".into())));
        assert_eq!(
            DirectiveError::InvalidBase("widget.xml".into()).to_string(),
            "Unable to parse the base directive uri [widget.xml]."
        );
    }

    #[test]
    fn base_only_is_accepted() {
        let directive = ComponentDirective::builder()
            .base("link:part:acme/widget")
            .build()
            .unwrap();
        assert_eq!(directive.classname(), None);
        assert_eq!(directive.base(), Some("link:part:acme/widget"));
        assert!(directive.context().is_empty());
    }

    #[test]
    fn new_sets_name_and_class() {
        let directive = ComponentDirective::new(Some("w"), "acme.Widget").unwrap();
        assert_eq!(directive.name(), Some("w"));
        assert_eq!(directive.classname(), Some("acme.Widget"));
        assert!(directive.part_references().is_empty());
    }
}
