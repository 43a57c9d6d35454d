//! `.type` documents: a component type written out as XML.

use crate::config::BuilderConfig;
use crate::decoder::ComponentDecoder;
use crate::encoder::ComponentEncoder;
use crate::error::{DecodeError, EncodeError};
use crate::resolver::PropertyResolver;
use hashbrown::HashSet;
use metro_dom::{DecodingError, Element, XmlWriter};
use metro_model::info::{
    Attributes, CategoryDescriptor, ContextDescriptor, EntryDescriptor, InfoDescriptor,
    PartDescriptor, PartOperation, Postfix, Requirement, Semantic, ServiceDescriptor, Type,
};
use metro_model::{CollectionPolicy, Composite, LifestylePolicy, Priority, Version};
use metro_state::{State, StateDecoder, StateEncoder};
use std::sync::Arc;

/// Namespace written on encoded type documents.
pub const DEFAULT_TYPE_NAMESPACE: &str = "dpml:metro:type";

/// Reads `.type` documents.
///
/// ```xml
/// <type>
///   <info name="widget" class="acme.Widget" version="1.2.0" lifestyle="singleton"
///         collection="hard" threadsafe="true">
///     <schema>urn:acme:widget</schema>
///     <properties>
///       <property name="vendor" value="acme"/>
///     </properties>
///   </info>
///   <categories>
///     <category name="http" priority="debug"/>
///   </categories>
///   <services>
///     <service class="acme.WidgetService" version="1.0"/>
///   </services>
///   <context class="acme.Widget$Context">
///     <entry key="host" class="java.lang.String"/>
///     <entry key="port" class="int" optional="true"/>
///   </context>
///   <parts>
///     <component key="cache" type="acme.Cache"/>
///   </parts>
///   <accessors>
///     <part key="cache">
///       <operation method="getCache" semantic="get" class="acme.Cache"/>
///     </part>
///   </accessors>
///   <state>...</state>
/// </type>
/// ```
///
/// Only `<info>` is mandatory. A missing `<state>` yields the null graph.
#[derive(Debug, Default)]
pub struct TypeDecoder {
    components: ComponentDecoder,
}

impl TypeDecoder {
    /// Creates a decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a type document.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the text is not well-formed or does not
    /// describe a valid type.
    pub fn parse_str(&self, source: &str) -> Result<Type, DecodeError> {
        let root = Element::parse_str(source)?;
        Ok(self.decode(&root)?)
    }

    /// Builds a type from a `<type>` element.
    ///
    /// # Errors
    ///
    /// Returns [`DecodingError`] naming the offending element.
    pub fn decode(&self, element: &Element) -> Result<Type, DecodingError> {
        if element.name() != "type" {
            return Err(DecodingError::new(
                element,
                format!("Type element name [{}] is not recognized.", element.name()),
            ));
        }
        let info = element.child("info").ok_or_else(|| {
            DecodingError::new(element, "Definition of <type> is missing the required <info> element.")
        })?;
        let info = decode_info(info)?;
        let categories = match element.child("categories") {
            Some(categories) => categories
                .children_named("category")
                .map(decode_category)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let services = match element.child("services") {
            Some(services) => services
                .children_named("service")
                .map(decode_service)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let context = match element.child("context") {
            Some(context) => decode_context(context)?,
            None => ContextDescriptor::new(None, Vec::new()),
        };
        let parts = match element.child("parts") {
            Some(parts) => self.components.build_parts(parts, &PropertyResolver::new())?,
            None => Vec::new(),
        };
        let part_descriptors = match element.child("accessors") {
            Some(accessors) => accessors
                .children_named("part")
                .map(decode_part)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let graph = match element.child("state") {
            Some(state) => Arc::new(
                StateDecoder::decode(state)
                    .map_err(|err| DecodingError::with_source(state, "Invalid state graph.", err))?,
            ),
            None => State::null(),
        };
        Type::builder()
            .info(info)
            .categories(categories)
            .services(services)
            .context(context)
            .parts(parts)
            .part_descriptors(part_descriptors)
            .graph(graph)
            .build()
            .map_err(|err| DecodingError::with_source(element, "Invalid type definition.", err))
    }
}

fn decode_info(element: &Element) -> Result<InfoDescriptor, DecodingError> {
    let mut builder = InfoDescriptor::builder(element.required_attribute("class")?)
        .threadsafe(element.bool_attribute("threadsafe", false)?);
    if let Some(name) = element.attribute("name") {
        builder = builder.name(name);
    }
    if let Some(version) = element.attribute("version") {
        let version =
            Version::parse(version).map_err(|err| DecodingError::with_source(element, "Invalid type version.", err))?;
        builder = builder.version(version);
    }
    if let Some(lifestyle) = element.attribute("lifestyle") {
        let policy = LifestylePolicy::parse(lifestyle)
            .map_err(|err| DecodingError::with_source(element, "Invalid lifestyle policy.", err))?;
        builder = builder.lifestyle(policy);
    }
    if let Some(collection) = element.attribute("collection") {
        let policy = CollectionPolicy::parse(collection)
            .map_err(|err| DecodingError::with_source(element, "Invalid collection policy.", err))?;
        builder = builder.collection(policy);
    }
    if let Some(schema) = element.child("schema") {
        builder = builder.configuration_schema(schema.text());
    }
    if let Some(properties) = element.child("properties") {
        builder = builder.attributes(decode_properties(properties)?);
    }
    builder
        .build()
        .map_err(|err| DecodingError::with_source(element, "Invalid info descriptor.", err))
}

fn decode_properties(element: &Element) -> Result<Attributes, DecodingError> {
    element
        .children_named("property")
        .map(|property| {
            Ok((
                property.required_attribute("name")?,
                property.attribute("value").unwrap_or_default(),
            ))
        })
        .collect()
}

fn decode_category(element: &Element) -> Result<CategoryDescriptor, DecodingError> {
    let mut category = CategoryDescriptor::new(element.required_attribute("name")?);
    if let Some(priority) = element.attribute("priority") {
        let priority = Priority::parse(priority)
            .map_err(|err| DecodingError::with_source(element, "Invalid category priority.", err))?;
        category = category.with_priority(priority);
    }
    if element.child("property").is_some() {
        category = category.with_attributes(decode_properties(element)?);
    }
    Ok(category)
}

fn decode_service(element: &Element) -> Result<ServiceDescriptor, DecodingError> {
    let service = ServiceDescriptor::new(element.required_attribute("class")?);
    match element.attribute("version") {
        Some(version) => {
            let version = Version::parse(version)
                .map_err(|err| DecodingError::with_source(element, "Invalid service version.", err))?;
            Ok(service.with_version(version))
        }
        None => Ok(service),
    }
}

fn decode_context(element: &Element) -> Result<ContextDescriptor, DecodingError> {
    let mut keys = HashSet::new();
    let entries = element
        .children_named("entry")
        .map(|entry| {
            let key = entry.required_attribute("key")?;
            if !keys.insert(key) {
                return Err(DecodingError::new(
                    entry,
                    format!("Duplicate context entry key [{key}]."),
                ));
            }
            let requirement = if entry.bool_attribute("optional", false)? {
                Requirement::Optional
            } else {
                Requirement::Required
            };
            Ok(
                EntryDescriptor::new(key, entry.required_attribute("class")?, requirement)
                    .with_volatile(entry.bool_attribute("volatile", false)?),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ContextDescriptor::new(
        element.attribute("class").map(str::to_string),
        entries,
    ))
}

fn decode_part(element: &Element) -> Result<PartDescriptor, DecodingError> {
    let operations = element
        .children_named("operation")
        .map(|operation| {
            let semantic = match operation.required_attribute("semantic")? {
                "get" => Semantic::Get,
                "release" => Semantic::Release,
                other => {
                    return Err(DecodingError::new(
                        operation,
                        format!("Unrecognized part semantic [{other}]."),
                    ));
                }
            };
            let postfix = match operation.attribute("postfix") {
                Some(value) => Some(
                    Postfix::ALL
                        .into_iter()
                        .find(|postfix| postfix.suffix() == value)
                        .ok_or_else(|| {
                            DecodingError::new(operation, format!("Unrecognized part postfix [{value}]."))
                        })?,
                ),
                None => None,
            };
            Ok(PartOperation::new(
                operation.required_attribute("method")?,
                semantic,
                postfix,
                operation.required_attribute("class")?,
            )
            .with_select(operation.bool_attribute("select", false)?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PartDescriptor::new(element.required_attribute("key")?, operations))
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoding
// ─────────────────────────────────────────────────────────────────────────────

/// Writes [`Type`]s as documents [`TypeDecoder`] reads.
#[derive(Debug, Clone)]
pub struct TypeEncoder {
    namespace: String,
    components: ComponentEncoder,
    states: StateEncoder,
}

impl Default for TypeEncoder {
    fn default() -> Self {
        Self::from_config(&BuilderConfig::default())
    }
}

impl TypeEncoder {
    /// Creates an encoder with the default namespaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder using the namespaces from `config`.
    #[must_use]
    pub fn from_config(config: &BuilderConfig) -> Self {
        Self {
            namespace: DEFAULT_TYPE_NAMESPACE.to_string(),
            components: ComponentEncoder::from_config(config),
            states: StateEncoder::new(config.state_namespace()),
        }
    }

    /// Encodes `value` as a standalone document.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if an inherited part is not a component
    /// directive.
    pub fn encode(&self, value: &Type) -> Result<String, EncodeError> {
        let mut writer = XmlWriter::new();
        writer.declaration();
        writer.open("type").attr("xmlns", &self.namespace);
        write_info(&mut writer, value.info());
        if !value.categories().is_empty() {
            writer.open("categories");
            for category in value.categories() {
                writer
                    .open("category")
                    .attr("name", category.name())
                    .attr_opt("priority", category.priority().map(Priority::as_str));
                write_properties(&mut writer, category.attributes());
                writer.close();
            }
            writer.close();
        }
        if !value.services().is_empty() {
            writer.open("services");
            for service in value.services() {
                writer
                    .open("service")
                    .attr("class", service.classname())
                    .attr("version", service.version().to_string());
                writer.close();
            }
            writer.close();
        }
        write_context(&mut writer, value.context());
        self.components.write_parts(&mut writer, value.part_references())?;
        if !value.part_descriptors().is_empty() {
            writer.open("accessors");
            for part in value.part_descriptors() {
                writer.open("part").attr("key", part.key());
                for operation in part.operations() {
                    let semantic = match operation.semantic() {
                        Semantic::Get => "get",
                        Semantic::Release => "release",
                    };
                    writer
                        .open("operation")
                        .attr("method", operation.method())
                        .attr("semantic", semantic)
                        .attr_opt("postfix", operation.postfix().map(Postfix::suffix))
                        .attr("class", operation.classname());
                    if operation.is_select() {
                        writer.attr("select", "true");
                    }
                    writer.close();
                }
                writer.close();
            }
            writer.close();
        }
        if !value.state_graph().is_null() {
            self.states.write(&mut writer, value.state_graph());
        }
        writer.close();
        Ok(writer.finish())
    }
}

fn write_info(writer: &mut XmlWriter, info: &InfoDescriptor) {
    writer
        .open("info")
        .attr("name", info.name())
        .attr("class", info.classname())
        .attr("version", info.version().to_string())
        .attr("lifestyle", info.lifestyle().as_str())
        .attr("collection", info.collection().as_str())
        .attr("threadsafe", info.is_threadsafe().to_string());
    if let Some(schema) = info.configuration_schema() {
        writer.open("schema").text(schema);
        writer.close();
    }
    if !info.attributes().is_empty() {
        writer.open("properties");
        write_properties(writer, info.attributes());
        writer.close();
    }
    writer.close();
}

fn write_properties(writer: &mut XmlWriter, attributes: &Attributes) {
    for (name, value) in attributes.iter() {
        writer.open("property").attr("name", name).attr("value", value);
        writer.close();
    }
}

fn write_context(writer: &mut XmlWriter, context: &ContextDescriptor) {
    if context.classname().is_none() && context.entries().is_empty() {
        return;
    }
    writer.open("context").attr_opt("class", context.classname());
    for entry in context.entries() {
        writer
            .open("entry")
            .attr("key", entry.key())
            .attr("class", entry.classname());
        if entry.is_optional() {
            writer.attr("optional", "true");
        }
        if entry.is_volatile() {
            writer.attr("volatile", "true");
        }
        writer.close();
    }
    writer.close();
}
