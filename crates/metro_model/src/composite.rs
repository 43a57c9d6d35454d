//! Keyed part references and the composite lookup contract.

use crate::data::Directive;
use crate::error::DirectiveError;
use serde::{Deserialize, Serialize};

/// A keyed directive held by a composite.
///
/// `priority` orders parts for deployment; it defaults to `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartReference {
    key: String,
    directive: Directive,
    priority: i32,
}

impl PartReference {
    /// Creates a reference with priority `0`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::EmptyKey`] if `key` is empty.
    pub fn new(key: impl Into<String>, directive: impl Into<Directive>) -> Result<Self, DirectiveError> {
        let key = key.into();
        if key.is_empty() {
            return Err(DirectiveError::EmptyKey);
        }
        Ok(Self {
            key,
            directive: directive.into(),
            priority: 0,
        })
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the referenced directive.
    #[must_use]
    pub fn directive(&self) -> &Directive {
        &self.directive
    }

    /// Returns the priority.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }
}

/// A value that owns an ordered sequence of [`PartReference`]s.
///
/// Keys are unique by convention only. Lookup is a linear scan and the
/// first reference with a matching key wins, so a later duplicate is
/// shadowed rather than rejected.
pub trait Composite {
    /// Returns the part references in declaration order.
    fn part_references(&self) -> &[PartReference];

    /// Returns the directive of the first reference keyed `key`.
    fn directive(&self, key: &str) -> Option<&Directive> {
        self.part_references()
            .iter()
            .find(|reference| reference.key() == key)
            .map(PartReference::directive)
    }

    /// Returns the keys in declaration order, duplicates included.
    fn part_keys(&self) -> Vec<&str> {
        self.part_references()
            .iter()
            .map(PartReference::key)
            .collect()
    }
}

impl Composite for [PartReference] {
    fn part_references(&self) -> &[PartReference] {
        self
    }
}

impl Composite for Vec<PartReference> {
    fn part_references(&self) -> &[PartReference] {
        self
    }
}
