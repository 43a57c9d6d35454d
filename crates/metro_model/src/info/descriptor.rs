//! Component identity.

use super::Attributes;
use crate::error::DescriptorError;
use crate::policy::{CollectionPolicy, LifestylePolicy};
use crate::version::Version;
use serde::{Deserialize, Serialize};

/// Identity and policies of a component type.
///
/// # Defaults
///
/// | Field | Default |
/// |-------|---------|
/// | `name` | lower-cased text after the last `.` of the classname |
/// | `version` | `1.0.0` |
/// | `lifestyle` | `Singleton` if threadsafe, otherwise `Transient` |
/// | `collection` | `System` |
/// | `threadsafe` | `false` |
///
/// # Example
///
/// ```
/// use metro_model::info::InfoDescriptor;
/// use metro_model::LifestylePolicy;
///
/// let info = InfoDescriptor::builder("acme.Widget").threadsafe(true).build().unwrap();
/// assert_eq!(info.name(), "widget");
/// assert_eq!(info.lifestyle(), LifestylePolicy::Singleton);
/// assert_eq!(info.to_string(), "[widget] acme.Widget:1.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InfoDescriptor {
    name: String,
    classname: String,
    version: Version,
    lifestyle: LifestylePolicy,
    collection: CollectionPolicy,
    threadsafe: bool,
    configuration_schema: Option<String>,
    attributes: Attributes,
}

impl InfoDescriptor {
    /// Creates a descriptor with default version and policies.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] if `classname` is empty or not a dotted
    /// identifier path.
    pub fn new(name: Option<&str>, classname: &str) -> Result<Self, DescriptorError> {
        let mut builder = Self::builder(classname);
        if let Some(name) = name {
            builder = builder.name(name);
        }
        builder.build()
    }

    /// Starts building a descriptor for `classname`.
    #[must_use]
    pub fn builder(classname: impl Into<String>) -> InfoDescriptorBuilder {
        InfoDescriptorBuilder {
            classname: classname.into(),
            ..InfoDescriptorBuilder::default()
        }
    }

    pub(crate) fn object() -> Self {
        Self {
            name: "object".to_string(),
            classname: "java.lang.Object".to_string(),
            version: Version::default(),
            lifestyle: LifestylePolicy::Transient,
            collection: CollectionPolicy::System,
            threadsafe: false,
            configuration_schema: None,
            attributes: Attributes::default(),
        }
    }

    /// Returns the component name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the implementation classname.
    #[must_use]
    pub fn classname(&self) -> &str {
        &self.classname
    }

    /// Returns the version.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the lifestyle policy.
    #[must_use]
    pub fn lifestyle(&self) -> LifestylePolicy {
        self.lifestyle
    }

    /// Returns the collection policy.
    #[must_use]
    pub fn collection(&self) -> CollectionPolicy {
        self.collection
    }

    /// Returns `true` if the implementation is threadsafe.
    #[must_use]
    pub fn is_threadsafe(&self) -> bool {
        self.threadsafe
    }

    /// Returns the configuration schema declared by the implementation.
    #[must_use]
    pub fn configuration_schema(&self) -> Option<&str> {
        self.configuration_schema.as_deref()
    }

    /// Returns the attributes.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns `true` if instances may be collected as soon as unreferenced.
    #[must_use]
    pub fn is_weak(&self) -> bool {
        self.collection == CollectionPolicy::Weak
    }

    /// Returns `true` if instances are collected under memory pressure.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        self.collection == CollectionPolicy::Soft
    }

    /// Returns `true` if instances are never collected.
    #[must_use]
    pub fn is_hard(&self) -> bool {
        self.collection == CollectionPolicy::Hard
    }
}

impl core::fmt::Display for InfoDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}] {}:{}", self.name, self.classname, self.version)
    }
}

/// Builder for [`InfoDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct InfoDescriptorBuilder {
    name: Option<String>,
    classname: String,
    version: Option<Version>,
    lifestyle: Option<LifestylePolicy>,
    collection: Option<CollectionPolicy>,
    threadsafe: bool,
    configuration_schema: Option<String>,
    attributes: Attributes,
}

impl InfoDescriptorBuilder {
    /// Sets an explicit name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the lifestyle policy.
    #[must_use]
    pub fn lifestyle(mut self, lifestyle: LifestylePolicy) -> Self {
        self.lifestyle = Some(lifestyle);
        self
    }

    /// Sets the collection policy.
    #[must_use]
    pub fn collection(mut self, collection: CollectionPolicy) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Sets the threadsafe flag.
    #[must_use]
    pub fn threadsafe(mut self, threadsafe: bool) -> Self {
        self.threadsafe = threadsafe;
        self
    }

    /// Sets the configuration schema.
    #[must_use]
    pub fn configuration_schema(mut self, schema: impl Into<String>) -> Self {
        self.configuration_schema = Some(schema.into());
        self
    }

    /// Replaces the attributes.
    #[must_use]
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Adds one attribute.
    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Builds the descriptor, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::MissingArgument`] if the classname is
    /// empty and [`DescriptorError::IllegalClassname`] if it contains a path
    /// separator or is not a dotted identifier path.
    pub fn build(self) -> Result<InfoDescriptor, DescriptorError> {
        validate_classname(&self.classname)?;
        let name = match self.name.filter(|name| !name.is_empty()) {
            Some(name) => name,
            None => derive_name(&self.classname),
        };
        let lifestyle = self.lifestyle.unwrap_or(if self.threadsafe {
            LifestylePolicy::Singleton
        } else {
            LifestylePolicy::Transient
        });
        Ok(InfoDescriptor {
            name,
            classname: self.classname,
            version: self.version.unwrap_or_default(),
            lifestyle,
            collection: self.collection.unwrap_or_default(),
            threadsafe: self.threadsafe,
            configuration_schema: self.configuration_schema,
            attributes: self.attributes,
        })
    }
}

fn derive_name(classname: &str) -> String {
    let simple = classname.rsplit('.').next().unwrap_or(classname);
    simple.to_lowercase()
}

/// Checks that `classname` is a dotted path of identifiers.
///
/// Identifiers may contain `$`, which separates nested class names.
///
/// # Errors
///
/// See [`InfoDescriptorBuilder::build`].
pub(crate) fn validate_classname(classname: &str) -> Result<(), DescriptorError> {
    if classname.is_empty() {
        return Err(DescriptorError::MissingArgument("classname"));
    }
    if classname.contains('/') {
        return Err(DescriptorError::IllegalClassname {
            classname: classname.to_string(),
            reason: "contains a path separator",
        });
    }
    let valid = classname.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|first| first.is_alphabetic() || first == '_' || first == '$')
            && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
    });
    if !valid {
        return Err(DescriptorError::IllegalClassname {
            classname: classname.to_string(),
            reason: "is not a dotted identifier path",
        });
    }
    Ok(())
}
