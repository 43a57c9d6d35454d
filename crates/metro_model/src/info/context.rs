//! Context requirements.

use serde::{Deserialize, Serialize};

/// Whether a context entry must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
    /// The container must supply a value.
    Required,
    /// The component supplies its own default.
    Optional,
}

/// A named, typed dependency supplied to a component at activation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryDescriptor {
    key: String,
    classname: String,
    requirement: Requirement,
    volatile: bool,
}

impl EntryDescriptor {
    /// Creates an entry.
    #[must_use]
    pub fn new(key: impl Into<String>, classname: impl Into<String>, requirement: Requirement) -> Self {
        Self {
            key: key.into(),
            classname: classname.into(),
            requirement,
            volatile: false,
        }
    }

    /// Creates a required entry.
    #[must_use]
    pub fn required(key: impl Into<String>, classname: impl Into<String>) -> Self {
        Self::new(key, classname, Requirement::Required)
    }

    /// Creates an optional entry.
    #[must_use]
    pub fn optional(key: impl Into<String>, classname: impl Into<String>) -> Self {
        Self::new(key, classname, Requirement::Optional)
    }

    /// Marks the entry volatile: its value is resolved on every access
    /// rather than once at activation.
    #[must_use]
    pub fn with_volatile(mut self, volatile: bool) -> Self {
        self.volatile = volatile;
        self
    }

    /// Returns the key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the entry type.
    #[must_use]
    pub fn classname(&self) -> &str {
        &self.classname
    }

    /// Returns the requirement.
    #[must_use]
    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    /// Returns `true` if the entry is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.requirement == Requirement::Required
    }

    /// Returns `true` if the entry is optional.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.requirement == Requirement::Optional
    }

    /// Returns `true` if the entry is volatile.
    #[must_use]
    pub fn is_volatile(&self) -> bool {
        self.volatile
    }
}

/// The context contract of a component type.
///
/// Entry keys are expected to be unique; this type records entries as
/// given and leaves enforcement to whoever assembles it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextDescriptor {
    classname: Option<String>,
    entries: Vec<EntryDescriptor>,
}

impl ContextDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(classname: Option<String>, entries: Vec<EntryDescriptor>) -> Self {
        Self { classname, entries }
    }

    /// Returns the context interface classname.
    #[must_use]
    pub fn classname(&self) -> Option<&str> {
        self.classname.as_deref()
    }

    /// Returns the entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[EntryDescriptor] {
        &self.entries
    }

    /// Returns the first entry with the given key.
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&EntryDescriptor> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Iterates the required entries.
    pub fn required_entries(&self) -> impl Iterator<Item = &EntryDescriptor> {
        self.entries.iter().filter(|entry| entry.is_required())
    }

    /// Returns keys declared more than once, each reported once.
    #[must_use]
    pub fn duplicate_keys(&self) -> Vec<&str> {
        let mut duplicates: Vec<&str> = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if self.entries[..index].iter().any(|earlier| earlier.key == entry.key)
                && !duplicates.contains(&entry.key.as_str())
            {
                duplicates.push(&entry.key);
            }
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_key() {
        let context = ContextDescriptor::new(
            Some("acme.Widget$Context".to_string()),
            vec![
                EntryDescriptor::required("host", "java.lang.String"),
                EntryDescriptor::optional("port", "int"),
            ],
        );
        assert!(context.entry("host").unwrap().is_required());
        assert!(context.entry("port").unwrap().is_optional());
        assert!(context.entry("missing").is_none());
        assert_eq!(context.required_entries().count(), 1);
    }

    #[test]
    fn duplicates_are_reported_not_rejected() {
        let context = ContextDescriptor::new(
            None,
            vec![
                EntryDescriptor::required("a", "int"),
                EntryDescriptor::required("a", "long"),
                EntryDescriptor::required("a", "short"),
            ],
        );
        assert_eq!(context.entries().len(), 3);
        assert_eq!(context.duplicate_keys(), vec!["a"]);
        assert_eq!(context.entry("a").unwrap().classname(), "int");
    }
}
