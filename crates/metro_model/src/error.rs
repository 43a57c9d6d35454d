//! Error types for the descriptor and directive model.

/// Errors raised when constructing descriptors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// A mandatory argument was not supplied.
    #[error("{0} required")]
    MissingArgument(&'static str),
    /// A classname is not a dotted identifier path.
    #[error("Classname [{classname}] {reason}.")]
    IllegalClassname {
        /// The rejected classname.
        classname: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// A policy string matched no known policy value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized {kind} argument [{value}]")]
pub struct PolicyError {
    /// Which policy was being parsed.
    pub kind: &'static str,
    /// The rejected value.
    pub value: String,
}

/// A version string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unable to parse version [{value}]")]
pub struct VersionError {
    /// The rejected value.
    pub value: String,
    /// Underlying integer parse failure, when one occurred.
    #[source]
    pub source: Option<core::num::ParseIntError>,
}

/// Errors raised when constructing deployment directives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    /// Both a component type and a base directive were declared.
    #[error("Illegal attempt to override a base type in a supertype.")]
    BaseOverride,
    /// Neither a component type nor a base directive was declared.
    #[error("Missing component type attribute.")]
    MissingType,
    /// The base directive reference is not an absolute URI.
    #[error("Unable to parse the base directive uri [{0}].")]
    InvalidBase(String),
    /// A part reference was given an empty key.
    #[error("Part reference key must not be empty.")]
    EmptyKey,
}

/// Errors raised when encoding or decoding serialized parts.
#[derive(Debug, thiserror::Error)]
#[error("serialized part codec failure: {0}")]
pub struct CodecError(#[from] pub serde_json::Error);
