//! Error types for introspection, decoding, and loading.

use metro_dom::{DecodingError, DomError};
use metro_model::{CodecError, DescriptorError};
use metro_state::StateDecodeError;

/// A class shape does not follow the context, part, or static marker
/// conventions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntrospectionError {
    /// An accessor name yields an empty key.
    #[error("Accessor [{class}#{method}] does not declare a key.")]
    EmptyKey {
        /// Declaring interface.
        class: String,
        /// Offending method.
        method: String,
    },
    /// A context accessor declares checked exceptions.
    #[error("Context entry accessor [{class}#{method}] declares exceptions.")]
    DeclaresExceptions {
        /// Declaring interface.
        class: String,
        /// Offending method.
        method: String,
    },
    /// A context accessor has an unusable return type.
    #[error("Context entry accessor [{class}#{method}] {reason}.")]
    IllegalReturnType {
        /// Declaring interface.
        class: String,
        /// Offending method.
        method: String,
        /// What is wrong with the return type.
        reason: &'static str,
    },
    /// The default argument of an optional accessor does not fit its
    /// return type.
    #[error(
        "Context entry assessor declares an optional default parameter class [{parameter}] which is not assignable to the return type [{return_type}] (method [{class}#{method}])."
    )]
    NotAssignable {
        /// Declaring interface.
        class: String,
        /// Offending method.
        method: String,
        /// Declared parameter type.
        parameter: String,
        /// Declared return type.
        return_type: String,
    },
    /// A context accessor declares more than one parameter.
    #[error(
        "Unable to establish a required or optional context entry method pattern on the method [{method}] of [{class}]."
    )]
    UnrecognizedPattern {
        /// Declaring interface.
        class: String,
        /// Offending method.
        method: String,
    },
    /// Overloaded accessors disagree about an entry.
    #[error("Context entry [{key}] of [{class}] is declared by conflicting accessors.")]
    ConflictingEntry {
        /// Declaring interface.
        class: String,
        /// Entry key.
        key: String,
    },
    /// A part accessor matches neither the GET nor the RELEASE pattern.
    #[error("Unrecognized part accessor method signature [{method}] in [{class}].")]
    UnrecognizedPartAccessor {
        /// Declaring interface.
        class: String,
        /// Offending method.
        method: String,
    },
    /// A part accessor breaks the rules of its pattern.
    #[error("Part accessor [{class}#{method}] for the key [{key}] {reason}.")]
    IllegalPartAccessor {
        /// Declaring interface.
        class: String,
        /// Offending method.
        method: String,
        /// Part key derived from the method name.
        key: String,
        /// Which rule was broken.
        reason: &'static str,
    },
    /// A part accessor takes a parameter other than a select flag.
    #[error("Part accessor [{class}#{method}] is declaring an illegal non-boolean parameter.")]
    NonBooleanSelect {
        /// Declaring interface.
        class: String,
        /// Offending method.
        method: String,
    },
    /// A static marker field has the wrong type.
    #[error(
        "The component type [{class}] declares an invalid static field {field} declaration. The declared type is not assignable to {expected}."
    )]
    InvalidStaticField {
        /// Component class.
        class: String,
        /// Marker field name.
        field: &'static str,
        /// Description of the required type.
        expected: &'static str,
    },
    /// A static marker field holds a value of the wrong kind.
    #[error(
        "The component type [{class}] declares an invalid static field {field} declaration. Could not convert the value to {expected}."
    )]
    InvalidStaticValue {
        /// Component class.
        class: String,
        /// Marker field name.
        field: &'static str,
        /// Description of the required value.
        expected: &'static str,
    },
}

/// Errors raised while reading XML declarations.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The document is not well-formed XML.
    #[error(transparent)]
    Dom(#[from] DomError),
    /// An element does not have the expected shape.
    #[error(transparent)]
    Decoding(#[from] DecodingError),
}

/// A directive cannot be written in the XML form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The directive kind has no XML form in this position.
    #[error("A {kind} directive cannot be encoded as the {position} entry [{key}].")]
    UnsupportedDirective {
        /// Key of the offending entry.
        key: String,
        /// Directive kind found.
        kind: &'static str,
        /// `context` or `part`.
        position: &'static str,
    },
}

/// Why a component directive could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadCause {
    /// The document could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The document could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The URI scheme is not a local file.
    #[error("unsupported URI scheme [{0}]")]
    UnsupportedScheme(String),
}

/// A component directive could not be loaded from a URI.
#[derive(Debug, thiserror::Error)]
#[error("An error while attempting to load a component directive.\nURI: {uri}")]
pub struct LoadError {
    uri: String,
    #[source]
    source: LoadCause,
}

impl LoadError {
    /// Creates a load error for `uri`.
    #[must_use]
    pub fn new(uri: impl Into<String>, source: impl Into<LoadCause>) -> Self {
        Self {
            uri: uri.into(),
            source: source.into(),
        }
    }

    /// Returns the URI that failed to load.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the underlying failure.
    #[must_use]
    pub fn cause(&self) -> &LoadCause {
        &self.source
    }
}

/// Errors raised while building a component type.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The class shape is not a valid component type.
    #[error("Unable to build the component type [{class}].")]
    Introspection {
        /// Component class.
        class: String,
        /// Underlying rule violation.
        #[source]
        source: IntrospectionError,
    },
    /// A descriptor could not be constructed.
    #[error("Invalid descriptor for the component type [{class}].")]
    Descriptor {
        /// Component class.
        class: String,
        /// Underlying construction failure.
        #[source]
        source: DescriptorError,
    },
    /// The state graph resource is malformed.
    #[error("Unable to decode the state graph resource [{resource}].")]
    StateGraph {
        /// Resource location.
        resource: String,
        /// Underlying decode failure.
        #[source]
        source: StateDecodeError,
    },
    /// The default configuration resource is malformed.
    #[error("Unable to decode the default configuration resource [{resource}].")]
    Configuration {
        /// Resource location.
        resource: String,
        /// Underlying decode failure.
        #[source]
        source: DomError,
    },
    /// The type document is malformed.
    #[error("Unable to decode the type resource [{resource}].")]
    TypeDocument {
        /// Resource location.
        resource: String,
        /// Underlying decode failure.
        #[source]
        source: DecodeError,
    },
    /// A resource exists but could not be read.
    #[error("Unable to read the resource [{resource}].")]
    Resource {
        /// Resource path.
        resource: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The class loader does not know the class.
    #[error("The class [{0}] could not be found.")]
    ClassNotFound(String),
    /// No classname was configured for loader-driven introspection.
    #[error("No component classname was configured.")]
    MissingClassname,
    /// A serialized part was produced by a different handler.
    #[error("Part handler [{found}] does not match the configured handler [{expected}].")]
    HandlerMismatch {
        /// Handler named by this configuration.
        expected: String,
        /// Handler named by the serialized part.
        found: String,
    },
    /// Serialized part codec failure.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
