//! Logging category directives.

use crate::policy::Priority;
use serde::{Deserialize, Serialize};

/// A single named category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryDirective {
    name: String,
    priority: Option<Priority>,
    target: Option<String>,
}

impl CategoryDirective {
    /// Creates a category that inherits priority and target.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: None,
            target: None,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the log target.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared priority.
    #[must_use]
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the declared target.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

/// A child of a [`CategoriesDirective`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryNode {
    /// A leaf category.
    Category(CategoryDirective),
    /// A nested group.
    Group(CategoriesDirective),
}

/// A named group of categories.
///
/// Priority and target declared on a group apply to every descendant that
/// does not declare its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoriesDirective {
    name: Option<String>,
    priority: Option<Priority>,
    target: Option<String>,
    categories: Vec<CategoryNode>,
}

/// A category with its inherited settings applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCategory {
    /// Dotted path from the outermost group.
    pub path: String,
    /// Effective priority.
    pub priority: Option<Priority>,
    /// Effective target.
    pub target: Option<String>,
}

impl CategoriesDirective {
    /// Creates an unnamed, empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the group name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the group priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the group target.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Adds a leaf category.
    #[must_use]
    pub fn with_category(mut self, category: CategoryDirective) -> Self {
        self.categories.push(CategoryNode::Category(category));
        self
    }

    /// Adds a nested group.
    #[must_use]
    pub fn with_group(mut self, group: CategoriesDirective) -> Self {
        self.categories.push(CategoryNode::Group(group));
        self
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the declared priority.
    #[must_use]
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the declared target.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns the children in declaration order.
    #[must_use]
    pub fn categories(&self) -> &[CategoryNode] {
        &self.categories
    }

    /// Returns `true` if the group declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.priority.is_none()
            && self.target.is_none()
            && self.categories.is_empty()
    }

    /// Flattens the tree into dotted category paths with inherited
    /// priority and target, in declaration order. Named groups appear
    /// before their children.
    #[must_use]
    pub fn flatten(&self) -> Vec<ResolvedCategory> {
        let mut out = Vec::new();
        self.flatten_into("", None, None, &mut out);
        out
    }

    fn flatten_into(
        &self,
        prefix: &str,
        priority: Option<Priority>,
        target: Option<&str>,
        out: &mut Vec<ResolvedCategory>,
    ) {
        let priority = self.priority.or(priority);
        let target = self.target.as_deref().or(target);
        let path = match self.name.as_deref() {
            Some(name) if !name.is_empty() => {
                let path = join(prefix, name);
                out.push(ResolvedCategory {
                    path: path.clone(),
                    priority,
                    target: target.map(str::to_string),
                });
                path
            }
            _ => prefix.to_string(),
        };
        for node in &self.categories {
            match node {
                CategoryNode::Category(category) => out.push(ResolvedCategory {
                    path: join(&path, category.name()),
                    priority: category.priority().or(priority),
                    target: category.target().or(target).map(str::to_string),
                }),
                CategoryNode::Group(group) => group.flatten_into(&path, priority, target, out),
            }
        }
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
