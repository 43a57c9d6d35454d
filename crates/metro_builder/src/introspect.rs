//! Component type synthesis from class shapes.

use crate::class::{ClassDescriptor, FieldValue, Introspect, MethodDescriptor};
use crate::config::BuilderConfig;
use crate::configuration::Configuration;
use crate::error::{BuildError, IntrospectionError};
use crate::graph::StateResolver;
use crate::loader::ClassLoader;
use crate::types::TypeDecoder;
use hashbrown::HashSet;
use indexmap::{IndexMap, IndexSet};
use metro_model::info::{
    Attributes, CategoryDescriptor, ContextDescriptor, EntryDescriptor, InfoDescriptor,
    PartDescriptor, PartOperation, Postfix, Requirement, Semantic, ServiceDescriptor, Type,
};
use metro_model::{CollectionPolicy, LifestylePolicy, PartReference, Version};
use metro_state::State;
use std::sync::Arc;

const CONTEXT_SUFFIX: &str = "$Context";
const PARTS_SUFFIX: &str = "$Parts";
const SCHEMA_FIELD: &str = "TYPE_CONFIGURATION_SCHEMA";
const PROPERTIES_FIELD: &str = "TYPE_INFO_PROPERTIES";
const STRING_CLASS: &str = "java.lang.String";
const PROPERTIES_CLASS: &str = "java.util.Properties";

// ─────────────────────────────────────────────────────────────────────────────
// TypeIntrospector
// ─────────────────────────────────────────────────────────────────────────────

/// Builds component [`Type`]s from implementation class shapes.
///
/// Settings that introspection cannot discover (name, policies, categories,
/// inherited parts) are supplied as overrides. An explicit service list or
/// state graph replaces discovery.
///
/// # Example
///
/// ```
/// use metro_builder::{ClassDescriptor, ClassPath, MethodDescriptor, TypeIntrospector};
///
/// let widget = ClassDescriptor::class("acme.Widget").inner(
///     ClassDescriptor::interface("acme.Widget$Context")
///         .method(MethodDescriptor::new("getHost").returns("java.lang.String"))
///         .method(MethodDescriptor::new("getPort").returns("int").param("int")),
/// );
/// let loader = ClassPath::new().with_class(widget.clone());
///
/// let widget_type = TypeIntrospector::new().build_type(&widget, &loader).unwrap();
/// let keys: Vec<_> = widget_type.context().entries().iter().map(|e| e.key()).collect();
/// assert_eq!(keys, ["host", "port"]);
/// assert!(widget_type.state_graph().is_null());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeIntrospector {
    config: BuilderConfig,
    classname: Option<String>,
    name: Option<String>,
    version: Option<Version>,
    lifestyle: Option<LifestylePolicy>,
    collection: Option<CollectionPolicy>,
    threadsafe: bool,
    services: Option<Vec<ServiceDescriptor>>,
    categories: Vec<CategoryDescriptor>,
    parts: Vec<PartReference>,
    state: Option<Arc<State>>,
}

impl TypeIntrospector {
    /// Creates an introspector with the default configuration and no
    /// overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the builder configuration.
    #[must_use]
    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the class built by [`TypeIntrospector::build`].
    #[must_use]
    pub fn with_classname(mut self, classname: impl Into<String>) -> Self {
        self.classname = Some(classname.into());
        self
    }

    /// Overrides the component name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides the type version.
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Overrides the lifestyle policy.
    #[must_use]
    pub fn with_lifestyle(mut self, lifestyle: LifestylePolicy) -> Self {
        self.lifestyle = Some(lifestyle);
        self
    }

    /// Overrides the collection policy.
    #[must_use]
    pub fn with_collection(mut self, collection: CollectionPolicy) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Declares the implementation threadsafe.
    #[must_use]
    pub fn with_threadsafe(mut self, threadsafe: bool) -> Self {
        self.threadsafe = threadsafe;
        self
    }

    /// Publishes exactly these services instead of discovering them.
    #[must_use]
    pub fn with_services(mut self, services: Vec<ServiceDescriptor>) -> Self {
        self.services = Some(services);
        self
    }

    /// Sets the logging categories.
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<CategoryDescriptor>) -> Self {
        self.categories = categories;
        self
    }

    /// Sets the inherited part references.
    #[must_use]
    pub fn with_parts(mut self, parts: Vec<PartReference>) -> Self {
        self.parts = parts;
        self
    }

    /// Uses `graph` instead of resolving the `.xgraph` resource.
    #[must_use]
    pub fn with_state(mut self, graph: Arc<State>) -> Self {
        self.state = Some(graph);
        self
    }

    /// Returns the builder configuration.
    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entry points
    // ─────────────────────────────────────────────────────────────────────────

    /// Builds the type for the configured classname.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingClassname`] if no classname was set,
    /// [`BuildError::ClassNotFound`] if the loader does not know it, and any
    /// error of [`TypeIntrospector::build_type`].
    pub fn build(&self, loader: &dyn ClassLoader) -> Result<Type, BuildError> {
        let classname = self.classname.as_deref().ok_or(BuildError::MissingClassname)?;
        let class = loader
            .load_class(classname)
            .ok_or_else(|| BuildError::ClassNotFound(classname.to_string()))?;
        self.build_type(class, loader)
    }

    /// Builds the type of an [`Introspect`] implementation.
    ///
    /// # Errors
    ///
    /// See [`TypeIntrospector::build_type`].
    pub fn build_type_of<T: Introspect>(&self, loader: &dyn ClassLoader) -> Result<Type, BuildError> {
        self.build_type(&T::class_descriptor(), loader)
    }

    /// Builds the component type of `class`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Introspection`] when the class shape breaks an
    /// accessor or marker rule, [`BuildError::StateGraph`] when the graph
    /// resource is malformed, and [`BuildError::Descriptor`] when the
    /// resulting descriptors are invalid.
    pub fn build_type(&self, class: &ClassDescriptor, loader: &dyn ClassLoader) -> Result<Type, BuildError> {
        let classname = class.name();
        tracing::debug!(class = classname, "introspecting component type");
        let info = self.create_info_descriptor(class, loader)?;
        let services = self.create_service_descriptors(class, loader);
        let context = self
            .create_context_descriptor(class, loader)
            .map_err(|source| introspection(classname, source))?;
        let part_descriptors = self
            .create_part_descriptors(class)
            .map_err(|source| introspection(classname, source))?;
        let graph = match &self.state {
            Some(graph) => Arc::clone(graph),
            None => StateResolver.resolve_state_graph(classname, loader)?,
        };
        let built = Type::builder()
            .info(info)
            .categories(self.categories.clone())
            .context(context)
            .services(services)
            .parts(self.parts.clone())
            .part_descriptors(part_descriptors)
            .graph(graph)
            .build()
            .map_err(|source| BuildError::Descriptor {
                class: classname.to_string(),
                source,
            })?;
        tracing::info!(
            class = classname,
            entries = built.context().entries().len(),
            services = built.services().len(),
            parts = built.part_descriptors().len(),
            "built component type"
        );
        Ok(built)
    }

    /// Loads the type of `classname`, preferring a `.type` document next to
    /// the class and falling back to introspection.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::TypeDocument`] if the document is malformed,
    /// [`BuildError::ClassNotFound`] if there is neither a document nor a
    /// class, and any error of [`TypeIntrospector::build_type`].
    pub fn load_type(&self, classname: &str, loader: &dyn ClassLoader) -> Result<Type, BuildError> {
        let path = format!("{}.type", classname.replace('.', "/"));
        let resource = loader.resource(&path).map_err(|source| BuildError::Resource {
            resource: path.clone(),
            source,
        })?;
        if let Some(resource) = resource {
            tracing::debug!(class = classname, resource = %resource.uri, "loading type document");
            return TypeDecoder::new()
                .parse_str(&resource.content)
                .map_err(|source| BuildError::TypeDocument {
                    resource: resource.uri,
                    source,
                });
        }
        let class = loader
            .load_class(classname)
            .ok_or_else(|| BuildError::ClassNotFound(classname.to_string()))?;
        self.build_type(class, loader)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Descriptors
    // ─────────────────────────────────────────────────────────────────────────

    /// Creates the info descriptor from the overrides and static markers.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Introspection`] for malformed marker fields and
    /// [`BuildError::Descriptor`] for an invalid classname.
    pub fn create_info_descriptor(
        &self,
        class: &ClassDescriptor,
        loader: &dyn ClassLoader,
    ) -> Result<InfoDescriptor, BuildError> {
        let classname = class.name();
        let schema = configuration_schema(class, loader).map_err(|source| introspection(classname, source))?;
        let properties = type_properties(class, loader).map_err(|source| introspection(classname, source))?;
        let mut builder = InfoDescriptor::builder(classname)
            .threadsafe(self.threadsafe)
            .attributes(properties);
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Some(version) = self.version {
            builder = builder.version(version);
        }
        if let Some(lifestyle) = self.lifestyle {
            builder = builder.lifestyle(lifestyle);
        }
        if let Some(collection) = self.collection {
            builder = builder.collection(collection);
        }
        if let Some(schema) = schema {
            builder = builder.configuration_schema(schema);
        }
        builder.build().map_err(|source| BuildError::Descriptor {
            class: classname.to_string(),
            source,
        })
    }

    /// Collects the services `class` publishes.
    ///
    /// Walks the interfaces declared by the class and each superclass the
    /// loader knows, in that order. Excluded prefixes and interfaces nested in
    /// the class declaring them are skipped; duplicates keep their first
    /// position.
    #[must_use]
    pub fn create_service_descriptors(
        &self,
        class: &ClassDescriptor,
        loader: &dyn ClassLoader,
    ) -> Vec<ServiceDescriptor> {
        if let Some(services) = &self.services {
            return services.clone();
        }
        let mut found: IndexSet<&str> = IndexSet::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = Some(class);
        while let Some(subject) = current {
            if !visited.insert(subject.name()) {
                break;
            }
            for interface in subject.interfaces() {
                if self.config.is_excluded_service(interface) || subject.encloses(interface) {
                    continue;
                }
                found.insert(interface.as_str());
            }
            current = subject.superclass().and_then(|name| loader.load_class(name));
        }
        tracing::debug!(class = class.name(), services = found.len(), "discovered services");
        found.into_iter().map(ServiceDescriptor::new).collect()
    }

    /// Creates the context descriptor from the nested `$Context` interface.
    ///
    /// A class without one has an empty context.
    ///
    /// # Errors
    ///
    /// See [`TypeIntrospector::create_entry_descriptors`].
    pub fn create_context_descriptor(
        &self,
        class: &ClassDescriptor,
        loader: &dyn ClassLoader,
    ) -> Result<ContextDescriptor, IntrospectionError> {
        match class.inner_class(CONTEXT_SUFFIX) {
            Some(context) => Ok(ContextDescriptor::new(
                Some(context.name().to_string()),
                self.create_entry_descriptors(context, loader)?,
            )),
            None => Ok(ContextDescriptor::new(None, Vec::new())),
        }
    }

    /// Creates one entry per key from the `get` accessors of a context
    /// interface, in declaration order.
    ///
    /// An accessor without parameters declares a required entry typed by its
    /// return type. An accessor with one parameter declares an optional entry
    /// whose default has the parameter's type. When both forms exist for a
    /// key the entry is optional. Methods not starting with `get` are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`IntrospectionError`] naming the offending method when an
    /// accessor declares exceptions, returns `void` or an array, has a
    /// default not assignable to its return type, or takes more than one
    /// parameter, and when overloads of one key disagree.
    pub fn create_entry_descriptors(
        &self,
        context: &ClassDescriptor,
        loader: &dyn ClassLoader,
    ) -> Result<Vec<EntryDescriptor>, IntrospectionError> {
        let mut entries: IndexMap<String, EntryDescriptor> = IndexMap::new();
        for method in context.methods().iter().filter(|method| method.name().starts_with("get")) {
            let entry = entry_descriptor(context.name(), method, loader)?;
            let merged = match entries.get(entry.key()) {
                Some(existing) => merge_entries(context.name(), existing, entry, loader)?,
                None => entry,
            };
            tracing::debug!(
                class = context.name(),
                key = merged.key(),
                classname = merged.classname(),
                required = merged.is_required(),
                "context entry"
            );
            entries.insert(merged.key().to_string(), merged);
        }
        Ok(entries.into_values().collect())
    }

    /// Creates the part descriptors from the nested `$Parts` interface,
    /// grouping accessors by key in order of first appearance.
    ///
    /// # Errors
    ///
    /// Returns [`IntrospectionError`] when an accessor matches neither the
    /// `get<Key>[Postfix]` nor the `release<Key>` pattern, or breaks the rules
    /// of the pattern it matches.
    pub fn create_part_descriptors(&self, class: &ClassDescriptor) -> Result<Vec<PartDescriptor>, IntrospectionError> {
        let Some(parts) = class.inner_class(PARTS_SUFFIX) else {
            return Ok(Vec::new());
        };
        let mut grouped: IndexMap<String, Vec<PartOperation>> = IndexMap::new();
        for method in parts.methods() {
            let (key, operation) = part_operation(class.name(), method)?;
            tracing::debug!(class = class.name(), key = %key, method = method.name(), "part accessor");
            grouped.entry(key).or_default().push(operation);
        }
        Ok(grouped
            .into_iter()
            .map(|(key, operations)| PartDescriptor::new(key, operations))
            .collect())
    }

    /// Reads the default configuration declared next to `class`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Configuration`] naming the resource if it is not
    /// well-formed, and [`BuildError::Resource`] if it cannot be read.
    pub fn default_configuration(
        &self,
        class: &ClassDescriptor,
        loader: &dyn ClassLoader,
    ) -> Result<Option<Configuration>, BuildError> {
        let path = format!("{}.xconfig", class.resource_base());
        let resource = loader.resource(&path).map_err(|source| BuildError::Resource {
            resource: path.clone(),
            source,
        })?;
        let Some(resource) = resource else {
            return Ok(None);
        };
        let configuration = Configuration::parse_str(&resource.content).map_err(|source| {
            BuildError::Configuration {
                resource: resource.uri.clone(),
                source,
            }
        })?;
        tracing::debug!(class = class.name(), resource = %resource.uri, "loaded default configuration");
        Ok(Some(configuration))
    }
}

fn introspection(class: &str, source: IntrospectionError) -> BuildError {
    BuildError::Introspection {
        class: class.to_string(),
        source,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Accessor rules
// ─────────────────────────────────────────────────────────────────────────────

fn format_key(class: &str, method: &str, stem: &str) -> Result<String, IntrospectionError> {
    let mut chars = stem.chars();
    let Some(first) = chars.next() else {
        return Err(IntrospectionError::EmptyKey {
            class: class.to_string(),
            method: method.to_string(),
        });
    };
    Ok(first.to_lowercase().chain(chars).collect())
}

fn entry_descriptor(
    class: &str,
    method: &MethodDescriptor,
    loader: &dyn ClassLoader,
) -> Result<EntryDescriptor, IntrospectionError> {
    let name = method.name();
    if !method.exceptions().is_empty() {
        return Err(IntrospectionError::DeclaresExceptions {
            class: class.to_string(),
            method: name.to_string(),
        });
    }
    let key = format_key(class, name, name.strip_prefix("get").unwrap_or(name))?;
    let return_type = method.return_type();
    let illegal_return = |reason| IntrospectionError::IllegalReturnType {
        class: class.to_string(),
        method: name.to_string(),
        reason,
    };
    match method.parameters() {
        [] => {
            if return_type.is_void() {
                return Err(illegal_return("declares a void return type"));
            }
            if return_type.is_array() {
                return Err(illegal_return("declares an array return type"));
            }
            Ok(EntryDescriptor::required(key, return_type.classname()))
        }
        [parameter] => {
            let parameter = parameter.classname();
            let returned = return_type.classname();
            if !loader.is_assignable(&parameter, &returned) {
                return Err(IntrospectionError::NotAssignable {
                    class: class.to_string(),
                    method: name.to_string(),
                    parameter,
                    return_type: returned,
                });
            }
            Ok(EntryDescriptor::optional(key, parameter))
        }
        _ => Err(IntrospectionError::UnrecognizedPattern {
            class: class.to_string(),
            method: name.to_string(),
        }),
    }
}

fn merge_entries(
    class: &str,
    existing: &EntryDescriptor,
    entry: EntryDescriptor,
    loader: &dyn ClassLoader,
) -> Result<EntryDescriptor, IntrospectionError> {
    match (existing.requirement(), entry.requirement()) {
        (Requirement::Required, Requirement::Optional)
            if loader.is_assignable(entry.classname(), existing.classname()) =>
        {
            Ok(entry)
        }
        (Requirement::Optional, Requirement::Required)
            if loader.is_assignable(existing.classname(), entry.classname()) =>
        {
            Ok(existing.clone())
        }
        _ if *existing == entry => Ok(entry),
        _ => Err(IntrospectionError::ConflictingEntry {
            class: class.to_string(),
            key: entry.key().to_string(),
        }),
    }
}

fn part_operation(class: &str, method: &MethodDescriptor) -> Result<(String, PartOperation), IntrospectionError> {
    let name = method.name();
    let illegal = |key: &str, reason| IntrospectionError::IllegalPartAccessor {
        class: class.to_string(),
        method: name.to_string(),
        key: key.to_string(),
        reason,
    };
    if let Some(rest) = name.strip_prefix("get") {
        let postfix = Postfix::of(rest);
        let stem = postfix.map_or(rest, |postfix| rest.strip_suffix(postfix.suffix()).unwrap_or(rest));
        let key = format_key(class, name, stem)?;
        if !method.exceptions().is_empty() {
            return Err(illegal(&key, "declares exceptions"));
        }
        let return_type = method.return_type();
        if return_type.is_void() {
            return Err(illegal(&key, "declares a void return type"));
        }
        if return_type.is_array() {
            return Err(illegal(&key, "declares an array return type"));
        }
        let select = match method.parameters() {
            [] => false,
            [parameter] if postfix == Some(Postfix::Component) => parameter.is_boolean(),
            [parameter] if parameter.is_boolean() => true,
            [_] => {
                return Err(IntrospectionError::NonBooleanSelect {
                    class: class.to_string(),
                    method: name.to_string(),
                });
            }
            _ => return Err(illegal(&key, "declares more than one parameter")),
        };
        let operation = PartOperation::new(name, Semantic::Get, postfix, return_type.classname()).with_select(select);
        Ok((key, operation))
    } else if let Some(rest) = name.strip_prefix("release") {
        let key = format_key(class, name, rest)?;
        if !method.exceptions().is_empty() {
            return Err(illegal(&key, "declares exceptions"));
        }
        let [parameter] = method.parameters() else {
            return Err(illegal(&key, "must declare exactly one parameter"));
        };
        if parameter.is_array() {
            return Err(illegal(&key, "declares an array parameter"));
        }
        if parameter.is_void() {
            return Err(illegal(&key, "declares a void parameter"));
        }
        if !method.return_type().is_void() {
            return Err(illegal(&key, "must return void"));
        }
        let operation = PartOperation::new(name, Semantic::Release, None, parameter.classname());
        Ok((key, operation))
    } else {
        Err(IntrospectionError::UnrecognizedPartAccessor {
            class: class.to_string(),
            method: name.to_string(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Static markers
// ─────────────────────────────────────────────────────────────────────────────

fn configuration_schema(class: &ClassDescriptor, loader: &dyn ClassLoader) -> Result<Option<String>, IntrospectionError> {
    let Some(field) = class.field_named(SCHEMA_FIELD).filter(|field| field.is_static()) else {
        return Ok(None);
    };
    if !loader.is_assignable(field.classname(), STRING_CLASS) {
        return Err(IntrospectionError::InvalidStaticField {
            class: class.name().to_string(),
            field: SCHEMA_FIELD,
            expected: "a string",
        });
    }
    match field.value() {
        FieldValue::Null => Ok(None),
        FieldValue::Text(schema) => Ok(Some(schema.clone())),
        FieldValue::Properties(_) => Err(IntrospectionError::InvalidStaticValue {
            class: class.name().to_string(),
            field: SCHEMA_FIELD,
            expected: "a string",
        }),
    }
}

fn type_properties(class: &ClassDescriptor, loader: &dyn ClassLoader) -> Result<Attributes, IntrospectionError> {
    let Some(field) = class.field_named(PROPERTIES_FIELD).filter(|field| field.is_static()) else {
        return Ok(Attributes::new());
    };
    if !loader.is_assignable(field.classname(), PROPERTIES_CLASS) {
        return Err(IntrospectionError::InvalidStaticField {
            class: class.name().to_string(),
            field: PROPERTIES_FIELD,
            expected: "a java.util.Properties value",
        });
    }
    match field.value() {
        FieldValue::Null => Ok(Attributes::new()),
        FieldValue::Properties(properties) => Ok(properties.clone()),
        FieldValue::Text(_) => Err(IntrospectionError::InvalidStaticValue {
            class: class.name().to_string(),
            field: PROPERTIES_FIELD,
            expected: "an instance of java.util.Properties",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_lowercase_only_the_first_character() {
        assert_eq!(format_key("C", "getHTTPPort", "HTTPPort").unwrap(), "hTTPPort");
        assert!(format_key("C", "get", "").is_err());
    }

    #[test]
    fn postfix_is_stripped_from_get_keys() {
        let method = MethodDescriptor::new("getCacheContextManager").returns("acme.Manager");
        let (key, operation) = part_operation("acme.Widget", &method).unwrap();
        assert_eq!(key, "cache");
        assert_eq!(operation.postfix(), Some(Postfix::ContextManager));
    }

    #[test]
    fn component_postfix_alone_has_no_key() {
        let method = MethodDescriptor::new("getComponent").returns("acme.Component");
        assert!(matches!(
            part_operation("acme.Widget", &method),
            Err(IntrospectionError::EmptyKey { .. })
        ));
    }
}
