//! Default configuration documents (`.xconfig`).

use metro_dom::{DomError, Element};

/// A node of a component's default configuration.
///
/// The document is kept as a generic tree; interpretation belongs to the
/// component that declared it.
///
/// ```
/// use metro_builder::Configuration;
///
/// let config = Configuration::parse_str(
///     r#"<configuration><pool size="4"/><greeting>hello</greeting></configuration>"#,
/// ).unwrap();
/// assert_eq!(config.child("pool").and_then(|pool| pool.attribute("size")), Some("4"));
/// assert_eq!(config.child("greeting").and_then(Configuration::value), Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    name: String,
    attributes: Vec<(String, String)>,
    value: Option<String>,
    children: Vec<Configuration>,
}

impl Configuration {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if the text is not well-formed XML.
    pub fn parse_str(source: &str) -> Result<Self, DomError> {
        Ok(Self::from_element(&Element::parse_str(source)?))
    }

    /// Converts an element tree.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let value = Some(element.text())
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        Self {
            name: element.name().to_string(),
            attributes: element
                .attributes()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            value,
            children: element.children().iter().map(Self::from_element).collect(),
        }
    }

    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the trimmed text content, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[Configuration] {
        &self.children
    }

    /// Returns the first child named `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Configuration> {
        self.children.iter().find(|child| child.name == name)
    }
}
