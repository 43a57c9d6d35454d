//! Owned XML element tree.

use crate::error::{DecodingError, DomError};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// An owned XML element.
///
/// Element and attribute names are stored without their namespace prefix.
/// Namespace declarations (`xmlns`, `xmlns:*`) and `xsi:*` attributes are
/// dropped while parsing so decoders only ever see the attributes that carry
/// meaning for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Creates an empty element with the given tag name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an attribute, replacing any existing value under the same name.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Parsing
    // ─────────────────────────────────────────────────────────────────────────

    /// Parses a document and returns its root element.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if the document is malformed, empty, or has more
    /// than one root element.
    pub fn parse_str(source: &str) -> Result<Self, DomError> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let position = reader.buffer_position();
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(source) => {
                    return Err(DomError::Xml {
                        position: reader.error_position(),
                        source,
                    });
                }
            };
            match event {
                Event::Start(start) => {
                    stack.push(Self::open(&start, position)?);
                }
                Event::Empty(start) => {
                    let element = Self::open(&start, position)?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::End(end) => {
                    let Some(element) = stack.pop() else {
                        return Err(DomError::UnexpectedEnd {
                            name: String::from_utf8_lossy(end.local_name().as_ref()).into_owned(),
                        });
                    };
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let text = text
                            .unescape()
                            .map_err(|source| DomError::Xml {
                                position,
                                source: source.into(),
                            })?;
                        current.text.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, doctypes.
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(DomError::Unclosed { name: open.name });
        }
        root.ok_or(DomError::Empty)
    }

    /// Reads and parses the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Io`] if the file cannot be read, otherwise any
    /// error from [`Element::parse_str`].
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, DomError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| DomError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "parsing XML document");
        Self::parse_str(&source)
    }

    fn open(start: &BytesStart<'_>, position: u64) -> Result<Self, DomError> {
        let mut element = Element::new(String::from_utf8_lossy(start.local_name().as_ref()));
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|source| DomError::Xml {
                position,
                source: source.into(),
            })?;
            let qualified = attribute.key.as_ref();
            if qualified.starts_with(b"xmlns") || qualified.starts_with(b"xsi:") {
                continue;
            }
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|source| DomError::Xml {
                    position,
                    source: source.into(),
                })?
                .into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn attach(
        stack: &mut [Element],
        root: &mut Option<Element>,
        element: Element,
    ) -> Result<(), DomError> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(element);
            return Ok(());
        }
        if root.is_some() {
            return Err(DomError::MultipleRoots);
        }
        *root = Some(element);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the local tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the named attribute, if declared.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` if the named attribute is declared.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Returns the value of a required attribute.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodingError`] naming this element if the attribute is
    /// absent.
    pub fn required_attribute(&self, name: &str) -> Result<&str, DecodingError> {
        self.attribute(name).ok_or_else(|| {
            DecodingError::new(self, format!("Missing required attribute [{name}]."))
        })
    }

    /// Returns a boolean attribute, or `default` when it is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodingError`] if the value is neither `true` nor `false`.
    pub fn bool_attribute(&self, name: &str, default: bool) -> Result<bool, DecodingError> {
        match self.attribute(name) {
            None => Ok(default),
            Some(value) if value.eq_ignore_ascii_case("true") => Ok(true),
            Some(value) if value.eq_ignore_ascii_case("false") => Ok(false),
            Some(value) => Err(DecodingError::new(
                self,
                format!("Attribute [{name}] value [{value}] is not a boolean."),
            )),
        }
    }

    /// Iterates attributes in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns all child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Returns the first child with the given tag name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Iterates the children with the given tag name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Returns the trimmed text content.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Renders the start tag, used to identify this element in errors.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = format!("<{}", self.name);
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {key}=\"{value}\""));
        }
        out.push('>');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested_elements() {
        let root = Element::parse_str("<a x=\"1\"><b/><c>text</c><b y=\"2\"/></a>").unwrap();
        assert_eq!(root.name(), "a");
        assert_eq!(root.attribute("x"), Some("1"));
        assert_eq!(root.children().len(), 3);
        assert_eq!(root.children_named("b").count(), 2);
        assert_eq!(root.child("c").map(Element::text), Some("text"));
    }

    #[test]
    fn namespace_declarations_are_dropped() {
        let root = Element::parse_str(
            r#"<m:component xmlns:m="dpml:metro" xmlns="dpml:metro" type="a.B"/>"#,
        )
        .unwrap();
        assert_eq!(root.name(), "component");
        assert_eq!(root.attributes().count(), 1);
    }

    #[test]
    fn entities_are_unescaped() {
        let root = Element::parse_str(r#"<v value="a &amp; b">x &lt; y</v>"#).unwrap();
        assert_eq!(root.attribute("value"), Some("a & b"));
        assert_eq!(root.text(), "x < y");
    }

    #[test]
    fn empty_document_fails() {
        assert!(matches!(Element::parse_str(""), Err(DomError::Empty)));
    }

    #[test]
    fn unclosed_element_fails() {
        assert!(Element::parse_str("<a><b>").is_err());
    }

    #[test]
    fn mismatched_end_fails() {
        assert!(Element::parse_str("<a></b>").is_err());
    }

    #[test]
    fn bool_attribute_defaults_and_rejects() {
        let element = Element::new("x").with_attribute("flag", "TRUE").with_attribute("bad", "yes");
        assert!(element.bool_attribute("flag", false).unwrap());
        assert!(!element.bool_attribute("missing", false).unwrap());
        assert!(element.bool_attribute("bad", false).is_err());
    }

    #[test]
    fn with_attribute_replaces_existing() {
        let element = Element::new("x").with_attribute("k", "1").with_attribute("k", "2");
        assert_eq!(element.attribute("k"), Some("2"));
        assert_eq!(element.attributes().count(), 1);
    }

    #[test]
    fn describe_renders_start_tag() {
        let element = Element::new("entry").with_attribute("key", "host");
        assert_eq!(element.describe(), "<entry key=\"host\">");
    }
}
