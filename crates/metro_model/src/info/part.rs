//! Part accessor descriptors.

use serde::{Deserialize, Serialize};

/// What a part accessor does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Semantic {
    /// Returns the part (`get<Key>`).
    Get,
    /// Releases a previously returned part (`release<Key>`).
    Release,
}

/// Accessor name suffix selecting a view of the part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Postfix {
    /// The part's component handle.
    Component,
    /// The part's context map.
    ContextMap,
    /// The part's context manager.
    ContextManager,
}

impl Postfix {
    /// Every postfix, longest suffix first.
    pub const ALL: [Postfix; 3] = [Self::ContextManager, Self::ContextMap, Self::Component];

    /// Returns the method name suffix.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Component => "Component",
            Self::ContextMap => "ContextMap",
            Self::ContextManager => "ContextManager",
        }
    }

    /// Returns the postfix whose suffix `method` ends with.
    #[must_use]
    pub fn of(method: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|postfix| method.ends_with(postfix.suffix()))
    }
}

/// One accessor method for a part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartOperation {
    method: String,
    semantic: Semantic,
    postfix: Option<Postfix>,
    classname: String,
    select: bool,
}

impl PartOperation {
    /// Creates an operation.
    ///
    /// `classname` is the return type for GET accessors and the parameter
    /// type for RELEASE accessors.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        semantic: Semantic,
        postfix: Option<Postfix>,
        classname: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            semantic,
            postfix,
            classname: classname.into(),
            select: false,
        }
    }

    /// Marks a GET accessor as the boolean-parameter select variant.
    #[must_use]
    pub fn with_select(mut self, select: bool) -> Self {
        self.select = select;
        self
    }

    /// Returns the accessor method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the semantic.
    #[must_use]
    pub fn semantic(&self) -> Semantic {
        self.semantic
    }

    /// Returns the postfix.
    #[must_use]
    pub fn postfix(&self) -> Option<Postfix> {
        self.postfix
    }

    /// Returns the accessor type.
    #[must_use]
    pub fn classname(&self) -> &str {
        &self.classname
    }

    /// Returns `true` for the select variant.
    #[must_use]
    pub fn is_select(&self) -> bool {
        self.select
    }
}

/// All accessors declared for one part key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartDescriptor {
    key: String,
    operations: Vec<PartOperation>,
}

impl PartDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(key: impl Into<String>, operations: Vec<PartOperation>) -> Self {
        Self {
            key: key.into(),
            operations,
        }
    }

    /// Returns the part key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the accessors in declaration order.
    #[must_use]
    pub fn operations(&self) -> &[PartOperation] {
        &self.operations
    }

    /// Returns the first accessor with the given semantic and postfix.
    #[must_use]
    pub fn operation(&self, semantic: Semantic, postfix: Option<Postfix>) -> Option<&PartOperation> {
        self.operations
            .iter()
            .find(|operation| operation.semantic == semantic && operation.postfix == postfix)
    }

    /// Returns the type returned by the plain GET accessor.
    #[must_use]
    pub fn return_type(&self) -> Option<&str> {
        self.operation(Semantic::Get, None)
            .map(PartOperation::classname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postfix_detection_prefers_longest() {
        assert_eq!(Postfix::of("getCacheContextManager"), Some(Postfix::ContextManager));
        assert_eq!(Postfix::of("getCacheContextMap"), Some(Postfix::ContextMap));
        assert_eq!(Postfix::of("getCacheComponent"), Some(Postfix::Component));
        assert_eq!(Postfix::of("getCache"), None);
    }

    #[test]
    fn return_type_uses_plain_get() {
        let descriptor = PartDescriptor::new(
            "cache",
            vec![
                PartOperation::new("getCacheComponent", Semantic::Get, Some(Postfix::Component), "acme.Component"),
                PartOperation::new("getCache", Semantic::Get, None, "acme.Cache"),
                PartOperation::new("releaseCache", Semantic::Release, None, "acme.Cache"),
            ],
        );
        assert_eq!(descriptor.return_type(), Some("acme.Cache"));
        assert!(descriptor.operation(Semantic::Release, None).is_some());
        assert!(descriptor.operation(Semantic::Release, Some(Postfix::ContextMap)).is_none());
    }
}
