//! Class and resource lookup.

use crate::class::{ClassDescriptor, TypeRef};
use hashbrown::{HashMap, HashSet};
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;

/// The root of every class hierarchy.
pub(crate) const OBJECT_CLASS: &str = "java.lang.Object";

/// A resource located by a [`ClassLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Where the content came from, for diagnostics.
    pub uri: String,
    /// The resource text.
    pub content: String,
}

/// Source of class shapes and companion resources.
///
/// Resources are addressed by `/`-separated paths relative to the class path
/// root, such as `acme/Widget.xgraph`.
pub trait ClassLoader: Send + Sync {
    /// Returns the class named `classname`, nested classes included.
    fn load_class(&self, classname: &str) -> Option<&ClassDescriptor>;

    /// Reads the resource at `path`.
    ///
    /// Returns `Ok(None)` when no such resource exists.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the resource exists but cannot be read.
    fn resource(&self, path: &str) -> io::Result<Option<Resource>>;

    /// Returns `true` if a value of type `from` may be used where `to` is
    /// expected.
    ///
    /// Primitive and array types are only assignable to themselves. Every
    /// other type is assignable to `java.lang.Object` and to any supertype
    /// reachable through classes this loader knows.
    fn is_assignable(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        let source = TypeRef::from(from);
        let target = TypeRef::from(to);
        if source.is_primitive() || source.is_array() || target.is_primitive() || target.is_array() {
            return false;
        }
        if to == OBJECT_CLASS {
            return true;
        }
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([from.to_string()]);
        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(class) = self.load_class(&current) {
                queue.extend(class.superclass().map(str::to_string));
                queue.extend(class.interfaces().iter().cloned());
            }
        }
        false
    }
}

/// An in-memory class path with optional directory roots for resources.
///
/// Registered classes are indexed together with all of their nested
/// classes. Resource lookups check in-memory resources first, then each
/// root directory in order.
#[derive(Default)]
pub struct ClassPath {
    classes: HashMap<String, ClassDescriptor>,
    resources: HashMap<String, String>,
    roots: Vec<PathBuf>,
}

impl core::fmt::Debug for ClassPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut classes: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        classes.sort_unstable();
        f.debug_struct("ClassPath")
            .field("classes", &classes)
            .field("resources", &self.resources.len())
            .field("roots", &self.roots)
            .finish()
    }
}

impl ClassPath {
    /// Creates an empty class path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class and its nested classes.
    #[must_use]
    pub fn with_class(mut self, class: ClassDescriptor) -> Self {
        self.register(class);
        self
    }

    /// Adds an in-memory resource.
    #[must_use]
    pub fn with_resource(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.resources.insert(path.into(), content.into());
        self
    }

    /// Adds a directory searched for resources.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Registers a class and its nested classes, replacing any existing
    /// class of the same name.
    pub fn register(&mut self, class: ClassDescriptor) {
        for inner in class.inner_classes() {
            self.register(inner.clone());
        }
        tracing::trace!(class = class.name(), "registered class");
        self.classes.insert(class.name().to_string(), class);
    }

    /// Returns the number of registered classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no class is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassLoader for ClassPath {
    fn load_class(&self, classname: &str) -> Option<&ClassDescriptor> {
        self.classes.get(classname)
    }

    fn resource(&self, path: &str) -> io::Result<Option<Resource>> {
        if let Some(content) = self.resources.get(path) {
            return Ok(Some(Resource {
                uri: format!("memory:{path}"),
                content: content.clone(),
            }));
        }
        for root in &self.roots {
            let candidate = root.join(path);
            match std::fs::read_to_string(&candidate) {
                Ok(content) => {
                    return Ok(Some(Resource {
                        uri: candidate.display().to_string(),
                        content,
                    }));
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> ClassPath {
        ClassPath::new()
            .with_class(ClassDescriptor::interface("acme.Service"))
            .with_class(ClassDescriptor::class("acme.Base").implements("acme.Service"))
            .with_class(
                ClassDescriptor::class("acme.Widget")
                    .extends("acme.Base")
                    .inner(ClassDescriptor::interface("acme.Widget$Context")),
            )
    }

    #[test]
    fn registers_nested_classes() {
        let path = hierarchy();
        assert_eq!(path.len(), 4);
        assert!(path.load_class("acme.Widget$Context").is_some());
    }

    #[test]
    fn walks_supertypes() {
        let path = hierarchy();
        assert!(path.is_assignable("acme.Widget", "acme.Base"));
        assert!(path.is_assignable("acme.Widget", "acme.Service"));
        assert!(path.is_assignable("acme.Unknown", "java.lang.Object"));
        assert!(!path.is_assignable("acme.Base", "acme.Widget"));
    }

    #[test]
    fn primitives_only_match_themselves() {
        let path = hierarchy();
        assert!(path.is_assignable("int", "int"));
        assert!(!path.is_assignable("int", "java.lang.Object"));
        assert!(!path.is_assignable("acme.Widget[]", "java.lang.Object"));
    }

    #[test]
    fn memory_resources_shadow_roots() {
        let path = ClassPath::new().with_resource("acme/Widget.xgraph", "<state/>");
        let resource = path.resource("acme/Widget.xgraph").unwrap().unwrap();
        assert_eq!(resource.content, "<state/>");
        assert!(path.resource("acme/Missing.xgraph").unwrap().is_none());
    }
}
