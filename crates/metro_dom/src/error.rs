//! Error types for XML parsing and decoding.

use crate::element::Element;

/// Errors raised while reading an XML document into an [`Element`] tree.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// The document is not well-formed.
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        /// Byte offset at which the parser failed.
        position: u64,
        /// Underlying parser error.
        #[source]
        source: quick_xml::Error,
    },
    /// An element was still open at the end of input.
    #[error("element <{name}> is not closed")]
    Unclosed {
        /// Tag name of the open element.
        name: String,
    },
    /// An end tag appeared with no matching start tag.
    #[error("unexpected end tag </{name}>")]
    UnexpectedEnd {
        /// Tag name of the end tag.
        name: String,
    },
    /// More than one top-level element.
    #[error("document contains more than one root element")]
    MultipleRoots,
    /// No top-level element.
    #[error("document has no root element")]
    Empty,
    /// The document could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the document.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A decoding failure attributed to a specific XML element.
///
/// Decoders raise this when an element is well-formed XML but does not have
/// the shape the decoder expects. The rendered message names the offending
/// element so the declaration can be located.
#[derive(Debug, thiserror::Error)]
#[error("{message} (element: {element})")]
pub struct DecodingError {
    message: String,
    element: String,
    #[source]
    source: Option<Box<dyn core::error::Error + Send + Sync + 'static>>,
}

impl DecodingError {
    /// Creates a decoding error for `element`.
    #[must_use]
    pub fn new(element: &Element, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            element: element.describe(),
            source: None,
        }
    }

    /// Creates a decoding error for `element` that wraps an underlying cause.
    #[must_use]
    pub fn with_source(
        element: &Element,
        message: impl Into<String>,
        source: impl Into<Box<dyn core::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            message: message.into(),
            element: element.describe(),
            source: Some(source.into()),
        }
    }

    /// Returns the human-readable cause.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the start tag of the offending element.
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }
}
