//! Provided services.

use crate::version::Version;
use serde::{Deserialize, Serialize};

/// A service interface a component type provides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    classname: String,
    version: Version,
}

impl ServiceDescriptor {
    /// Creates a service at version `1.0.0`.
    #[must_use]
    pub fn new(classname: impl Into<String>) -> Self {
        Self {
            classname: classname.into(),
            version: Version::default(),
        }
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Returns the service interface classname.
    #[must_use]
    pub fn classname(&self) -> &str {
        &self.classname
    }

    /// Returns the version.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns `true` if this service satisfies `reference`: same interface
    /// and a version that complies with the requested one.
    #[must_use]
    pub fn matches(&self, reference: &ServiceDescriptor) -> bool {
        self.classname == reference.classname && self.version.complies(&reference.version)
    }
}

impl core::fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.classname, self.version)
    }
}
