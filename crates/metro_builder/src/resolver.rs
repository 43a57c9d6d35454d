//! Symbolic value expansion for decoded attributes.

use hashbrown::HashMap;

/// Expands symbolic references in attribute values before they are
/// interpreted.
pub trait Resolver {
    /// Returns `value` with every symbolic reference expanded.
    fn resolve(&self, value: &str) -> String;
}

/// Expands `${key}` references from a property table.
///
/// References to unknown keys and unterminated `${` sequences are left in
/// place.
///
/// ```
/// use metro_builder::{PropertyResolver, Resolver};
///
/// let resolver = PropertyResolver::new().with_property("host", "localhost");
/// assert_eq!(resolver.resolve("http://${host}:${port}"), "http://localhost:${port}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyResolver {
    properties: HashMap<String, String>,
}

impl PropertyResolver {
    /// Creates a resolver with no properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl Resolver for PropertyResolver {
    fn resolve(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let tail = &rest[start + 2..];
            let Some(end) = tail.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };
            let key = &tail[..end];
            match self.properties.get(key) {
                Some(replacement) => out.push_str(replacement),
                None => out.push_str(&rest[start..start + 3 + end]),
            }
            rest = &tail[end + 1..];
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_unterminated_references() {
        let resolver = PropertyResolver::new().with_property("a", "1");
        assert_eq!(resolver.resolve("${a}-${b"), "1-${b");
    }

    #[test]
    fn expands_adjacent_references() {
        let resolver = PropertyResolver::new()
            .with_property("a", "x")
            .with_property("b", "y");
        assert_eq!(resolver.resolve("${a}${b}"), "xy");
        assert_eq!(resolver.resolve("plain"), "plain");
    }
}
