//! The component type descriptor.

use super::{
    CategoryDescriptor, ContextDescriptor, InfoDescriptor, PartDescriptor, ServiceDescriptor,
};
use crate::composite::{Composite, PartReference};
use crate::error::DescriptorError;
use metro_state::State;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

static OBJECT_TYPE: LazyLock<Type> = LazyLock::new(|| Type {
    info: InfoDescriptor::object(),
    categories: Vec::new(),
    context: ContextDescriptor::default(),
    services: Vec::new(),
    parts: Vec::new(),
    part_descriptors: Vec::new(),
    graph: State::null(),
});

/// The complete description of one component implementation.
///
/// Built once per implementation class, by introspection or by decoding a
/// `.type` document, and shared read-only by every instance. Equality is
/// structural; sequence fields compare index by index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Type {
    info: InfoDescriptor,
    categories: Vec<CategoryDescriptor>,
    context: ContextDescriptor,
    services: Vec<ServiceDescriptor>,
    parts: Vec<PartReference>,
    part_descriptors: Vec<PartDescriptor>,
    graph: Arc<State>,
}

impl Type {
    /// Starts assembling a type.
    #[must_use]
    pub fn builder() -> TypeBuilder {
        TypeBuilder::default()
    }

    /// Returns the degenerate type describing `java.lang.Object`: no
    /// context, services, categories, or parts, and the null state graph.
    #[must_use]
    pub fn object_type() -> &'static Type {
        &OBJECT_TYPE
    }

    /// Returns the identity descriptor.
    #[must_use]
    pub fn info(&self) -> &InfoDescriptor {
        &self.info
    }

    /// Returns the logging categories.
    #[must_use]
    pub fn categories(&self) -> &[CategoryDescriptor] {
        &self.categories
    }

    /// Returns the category with the given name.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&CategoryDescriptor> {
        self.categories.iter().find(|category| category.name() == name)
    }

    /// Returns `true` if the type declares the named category.
    #[must_use]
    pub fn is_a_category(&self, name: &str) -> bool {
        self.category(name).is_some()
    }

    /// Returns the context contract.
    #[must_use]
    pub fn context(&self) -> &ContextDescriptor {
        &self.context
    }

    /// Returns the provided services.
    #[must_use]
    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// Returns the service with the given interface classname.
    #[must_use]
    pub fn service(&self, classname: &str) -> Option<&ServiceDescriptor> {
        self.services
            .iter()
            .find(|service| service.classname() == classname)
    }

    /// Returns the first service that satisfies `reference`.
    #[must_use]
    pub fn service_matching(&self, reference: &ServiceDescriptor) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|service| service.matches(reference))
    }

    /// Returns the part accessor descriptors.
    #[must_use]
    pub fn part_descriptors(&self) -> &[PartDescriptor] {
        &self.part_descriptors
    }

    /// Returns the part accessor descriptor for `key`.
    #[must_use]
    pub fn part_descriptor(&self, key: &str) -> Option<&PartDescriptor> {
        self.part_descriptors
            .iter()
            .find(|descriptor| descriptor.key() == key)
    }

    /// Returns the lifecycle state graph.
    #[must_use]
    pub fn state_graph(&self) -> &Arc<State> {
        &self.graph
    }
}

impl Composite for Type {
    fn part_references(&self) -> &[PartReference] {
        &self.parts
    }
}

impl core::fmt::Display for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.info, f)
    }
}

/// Assembles a [`Type`].
///
/// `info`, `categories`, `context`, and `graph` are mandatory; `services`,
/// `parts`, and `part_descriptors` default to empty.
#[derive(Debug, Clone, Default)]
pub struct TypeBuilder {
    info: Option<InfoDescriptor>,
    categories: Option<Vec<CategoryDescriptor>>,
    context: Option<ContextDescriptor>,
    services: Option<Vec<ServiceDescriptor>>,
    parts: Vec<PartReference>,
    part_descriptors: Vec<PartDescriptor>,
    graph: Option<Arc<State>>,
}

impl TypeBuilder {
    /// Sets the identity descriptor.
    #[must_use]
    pub fn info(mut self, info: InfoDescriptor) -> Self {
        self.info = Some(info);
        self
    }

    /// Sets the logging categories.
    #[must_use]
    pub fn categories(mut self, categories: Vec<CategoryDescriptor>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Sets the context contract.
    #[must_use]
    pub fn context(mut self, context: ContextDescriptor) -> Self {
        self.context = Some(context);
        self
    }

    /// Sets the provided services.
    #[must_use]
    pub fn services(mut self, services: Vec<ServiceDescriptor>) -> Self {
        self.services = Some(services);
        self
    }

    /// Sets the part references.
    #[must_use]
    pub fn parts(mut self, parts: Vec<PartReference>) -> Self {
        self.parts = parts;
        self
    }

    /// Sets the part accessor descriptors.
    #[must_use]
    pub fn part_descriptors(mut self, descriptors: Vec<PartDescriptor>) -> Self {
        self.part_descriptors = descriptors;
        self
    }

    /// Sets the lifecycle state graph.
    #[must_use]
    pub fn graph(mut self, graph: Arc<State>) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Builds the type.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::MissingArgument`] naming the first
    /// mandatory component that was not supplied.
    pub fn build(self) -> Result<Type, DescriptorError> {
        let info = self.info.ok_or(DescriptorError::MissingArgument("info"))?;
        let categories = self
            .categories
            .ok_or(DescriptorError::MissingArgument("categories"))?;
        let context = self
            .context
            .ok_or(DescriptorError::MissingArgument("context"))?;
        let graph = self.graph.ok_or(DescriptorError::MissingArgument("graph"))?;
        Ok(Type {
            info,
            categories,
            context,
            services: self.services.unwrap_or_default(),
            parts: self.parts,
            part_descriptors: self.part_descriptors,
            graph,
        })
    }
}
