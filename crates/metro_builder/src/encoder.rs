//! Component directive encoding.

use crate::config::BuilderConfig;
use crate::error::EncodeError;
use metro_dom::XmlWriter;
use metro_model::{ActivationPolicy, CollectionPolicy, Composite, LifestylePolicy, PartReference, Priority};
use metro_model::data::{
    CategoriesDirective, CategoryNode, ComponentDirective, ContextDirective, Directive, ValueDirective,
};

/// Writes [`ComponentDirective`]s in the form [`ComponentDecoder`] reads.
///
/// [`ComponentDecoder`]: crate::ComponentDecoder
///
/// ```
/// use metro_builder::{ComponentDecoder, ComponentEncoder};
/// use metro_model::data::ComponentDirective;
///
/// let directive = ComponentDirective::new(Some("widget"), "acme.Widget").unwrap();
/// let xml = ComponentEncoder::new().encode(&directive).unwrap();
/// assert_eq!(ComponentDecoder::new().parse_str(&xml).unwrap(), directive);
/// ```
#[derive(Debug, Clone)]
pub struct ComponentEncoder {
    namespace: String,
}

impl Default for ComponentEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentEncoder {
    /// Creates an encoder using the default component namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&BuilderConfig::default())
    }

    /// Creates an encoder using the namespace from `config`.
    #[must_use]
    pub fn from_config(config: &BuilderConfig) -> Self {
        Self {
            namespace: config.component_namespace().to_string(),
        }
    }

    /// Encodes `directive` as a standalone document.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::UnsupportedDirective`] when a context entry
    /// holds a component directive or a part holds anything but one.
    pub fn encode(&self, directive: &ComponentDirective) -> Result<String, EncodeError> {
        let mut writer = XmlWriter::new();
        writer.declaration();
        writer.open("component").attr("xmlns", &self.namespace);
        write_component_body(&mut writer, directive)?;
        writer.close();
        Ok(writer.finish())
    }

    /// Writes the `<parts>` element for `parts`, if there are any.
    ///
    /// # Errors
    ///
    /// See [`ComponentEncoder::encode`].
    pub fn write_parts(&self, writer: &mut XmlWriter, parts: &[PartReference]) -> Result<(), EncodeError> {
        write_parts(writer, parts)
    }
}

fn write_component_body(writer: &mut XmlWriter, directive: &ComponentDirective) -> Result<(), EncodeError> {
    writer
        .attr_opt("type", directive.classname())
        .attr_opt("uri", directive.base())
        .attr_opt("name", directive.name())
        .attr_opt("activation", directive.activation().map(ActivationPolicy::as_str))
        .attr_opt("collection", directive.collection().map(CollectionPolicy::as_str))
        .attr_opt("lifestyle", directive.lifestyle().map(LifestylePolicy::as_str));
    if let Some(categories) = directive.categories() {
        writer.open("categories");
        write_categories(writer, categories);
        writer.close();
    }
    if !directive.context().is_empty() {
        writer.open("context");
        write_context(writer, directive.context())?;
        writer.close();
    }
    write_parts(writer, directive.part_references())
}

fn write_parts(writer: &mut XmlWriter, parts: &[PartReference]) -> Result<(), EncodeError> {
    if parts.is_empty() {
        return Ok(());
    }
    writer.open("parts");
    for part in parts {
        let Directive::Component(component) = part.directive() else {
            return Err(unsupported(part, "part"));
        };
        writer.open("component").attr("key", part.key());
        if part.priority() != 0 {
            writer.attr("priority", part.priority().to_string());
        }
        write_component_body(writer, component)?;
        writer.close();
    }
    writer.close();
    Ok(())
}

fn write_context(writer: &mut XmlWriter, context: &ContextDirective) -> Result<(), EncodeError> {
    writer.attr_opt("class", context.classname());
    for entry in context.part_references() {
        match entry.directive() {
            Directive::Value(value) => {
                writer.open("entry").attr("key", entry.key());
                write_value(writer, value);
                writer.close();
            }
            Directive::Lookup(lookup) => {
                writer
                    .open("lookup")
                    .attr("key", entry.key())
                    .attr("class", lookup.service());
                writer.close();
            }
            Directive::Context(nested) => {
                writer.open("context").attr("key", entry.key());
                write_context(writer, nested)?;
                writer.close();
            }
            Directive::Component(_) => return Err(unsupported(entry, "context")),
        }
    }
    Ok(())
}

fn write_value(writer: &mut XmlWriter, value: &ValueDirective) {
    writer
        .attr_opt("class", value.classname())
        .attr_opt("method", value.method())
        .attr_opt("value", value.value());
    for param in value.params() {
        writer.open("param");
        write_value(writer, param);
        writer.close();
    }
}

fn write_categories(writer: &mut XmlWriter, group: &CategoriesDirective) {
    writer
        .attr_opt("name", group.name())
        .attr_opt("priority", group.priority().map(Priority::as_str))
        .attr_opt("target", group.target());
    for node in group.categories() {
        match node {
            CategoryNode::Category(category) => {
                writer
                    .open("category")
                    .attr("name", category.name())
                    .attr_opt("priority", category.priority().map(Priority::as_str))
                    .attr_opt("target", category.target());
                writer.close();
            }
            CategoryNode::Group(nested) => {
                writer.open("categories");
                write_categories(writer, nested);
                writer.close();
            }
        }
    }
}

fn unsupported(entry: &PartReference, position: &'static str) -> EncodeError {
    let kind = match entry.directive() {
        Directive::Component(_) => "component",
        Directive::Value(_) => "value",
        Directive::Lookup(_) => "lookup",
        Directive::Context(_) => "context",
    };
    EncodeError::UnsupportedDirective {
        key: entry.key().to_string(),
        kind,
        position,
    }
}
