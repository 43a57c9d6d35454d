//! Builder configuration.

use metro_state::DEFAULT_STATE_NAMESPACE;

/// URI of the runtime that handles exported parts.
pub const DEFAULT_PART_HANDLER_URI: &str = "link:part:dpml/metro/dpml-metro-runtime";

/// URI of the builder that produced exported parts.
pub const DEFAULT_PART_BUILDER_URI: &str = "link:part:dpml/metro/dpml-metro-builder";

/// Namespace written on encoded component directives.
pub const DEFAULT_COMPONENT_NAMESPACE: &str = "dpml:metro";

/// Settings shared by the builders and codecs in this crate.
///
/// # Example
///
/// ```
/// use metro_builder::BuilderConfig;
///
/// let config = BuilderConfig::new()
///     .with_component_namespace("urn:acme:component")
///     .with_excluded_service_prefix("acme.internal.");
/// assert!(config.is_excluded_service("acme.internal.Hook"));
/// assert!(config.is_excluded_service("java.io.Serializable"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    part_handler_uri: String,
    part_builder_uri: String,
    component_namespace: String,
    state_namespace: String,
    excluded_service_prefixes: Vec<String>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            part_handler_uri: DEFAULT_PART_HANDLER_URI.to_string(),
            part_builder_uri: DEFAULT_PART_BUILDER_URI.to_string(),
            component_namespace: DEFAULT_COMPONENT_NAMESPACE.to_string(),
            state_namespace: DEFAULT_STATE_NAMESPACE.to_string(),
            excluded_service_prefixes: vec!["java.".to_string(), "javax.".to_string()],
        }
    }
}

impl BuilderConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the part handler URI.
    #[must_use]
    pub fn with_part_handler_uri(mut self, uri: impl Into<String>) -> Self {
        self.part_handler_uri = uri.into();
        self
    }

    /// Sets the part builder URI.
    #[must_use]
    pub fn with_part_builder_uri(mut self, uri: impl Into<String>) -> Self {
        self.part_builder_uri = uri.into();
        self
    }

    /// Sets the component directive namespace.
    #[must_use]
    pub fn with_component_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.component_namespace = namespace.into();
        self
    }

    /// Sets the state graph namespace.
    #[must_use]
    pub fn with_state_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.state_namespace = namespace.into();
        self
    }

    /// Adds a classname prefix that is never published as a service.
    #[must_use]
    pub fn with_excluded_service_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.excluded_service_prefixes.push(prefix.into());
        self
    }

    /// Returns the part handler URI.
    #[must_use]
    pub fn part_handler_uri(&self) -> &str {
        &self.part_handler_uri
    }

    /// Returns the part builder URI.
    #[must_use]
    pub fn part_builder_uri(&self) -> &str {
        &self.part_builder_uri
    }

    /// Returns the component directive namespace.
    #[must_use]
    pub fn component_namespace(&self) -> &str {
        &self.component_namespace
    }

    /// Returns the state graph namespace.
    #[must_use]
    pub fn state_namespace(&self) -> &str {
        &self.state_namespace
    }

    /// Returns `true` if `classname` starts with an excluded prefix.
    #[must_use]
    pub fn is_excluded_service(&self, classname: &str) -> bool {
        self.excluded_service_prefixes
            .iter()
            .any(|prefix| classname.starts_with(prefix.as_str()))
    }
}
