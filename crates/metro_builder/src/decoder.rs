//! Component directive decoding.

use crate::error::{DecodeError, LoadCause, LoadError};
use crate::resolver::{PropertyResolver, Resolver};
use metro_dom::{DecodingError, Element};
use metro_model::data::{
    CategoriesDirective, CategoryDirective, ComponentDirective, ContextDirective, Directive,
    LookupDirective, ValueDirective, is_uri,
};
use metro_model::{ActivationPolicy, CollectionPolicy, LifestylePolicy, PartReference, Priority};

/// Reads `<component>` directives.
///
/// Attribute values pass through a [`Resolver`] before interpretation, so
/// `${key}` references can be bound at decode time.
///
/// # Document shape
///
/// ```xml
/// <component type="acme.Widget" name="widget" lifestyle="singleton">
///   <categories priority="info">
///     <category name="http" priority="debug"/>
///   </categories>
///   <context class="acme.Widget$Context">
///     <entry key="host" value="localhost"/>
///     <entry key="origin" class="java.awt.Point">
///       <param class="int" value="0"/>
///       <param class="int" value="0"/>
///     </entry>
///     <lookup key="gadget" class="acme.Gadget"/>
///   </context>
///   <parts>
///     <component key="cache" type="acme.Cache" priority="1"/>
///   </parts>
/// </component>
/// ```
///
/// A directive names either its implementation (`type`) or the URI of a
/// base directive it extends (`uri`), never both.
pub struct ComponentDecoder {
    resolver: Box<dyn Resolver + Send + Sync>,
}

impl core::fmt::Debug for ComponentDecoder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComponentDecoder").finish_non_exhaustive()
    }
}

impl Default for ComponentDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentDecoder {
    /// Creates a decoder that leaves attribute values untouched except for
    /// `${key}` references, which stay unexpanded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolver: Box::new(PropertyResolver::new()),
        }
    }

    /// Uses `resolver` for [`ComponentDecoder::parse_str`] and
    /// [`ComponentDecoder::load_component_directive`].
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl Resolver + Send + Sync + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Decodes a directive document.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the text is not well-formed or the root
    /// element is not a valid directive.
    pub fn parse_str(&self, source: &str) -> Result<ComponentDirective, DecodeError> {
        let root = Element::parse_str(source)?;
        Ok(self.build_component(&root, self.resolver.as_ref())?)
    }

    /// Loads a directive from a `file:` URI or a plain path.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] carrying `uri` and wrapping the underlying read
    /// or decode failure.
    pub fn load_component_directive(&self, uri: &str) -> Result<ComponentDirective, LoadError> {
        let path = local_path(uri).map_err(|cause| LoadError::new(uri, cause))?;
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::new(uri, source))?;
        let directive = self.parse_str(&text).map_err(|source| LoadError::new(uri, source))?;
        tracing::info!(uri, "loaded component directive");
        Ok(directive)
    }

    /// Builds a directive from a `<component>` element.
    ///
    /// # Errors
    ///
    /// Returns [`DecodingError`] naming the offending element when the shape
    /// is wrong, a policy or priority does not parse, or both or neither of
    /// `type` and `uri` are present.
    pub fn build_component(
        &self,
        element: &Element,
        resolver: &dyn Resolver,
    ) -> Result<ComponentDirective, DecodingError> {
        if element.name() != "component" {
            return Err(DecodingError::new(
                element,
                format!("Component directive element name [{}] is not recognized.", element.name()),
            ));
        }
        let classname = resolved(element, "type", resolver);
        let base = resolved(element, "uri", resolver);
        let mut builder = ComponentDirective::builder();
        match (classname, base) {
            (Some(_), Some(_)) => {
                return Err(DecodingError::new(
                    element,
                    "Illegal attempt to override a base type in a supertype.",
                ));
            }
            (None, None) => {
                return Err(DecodingError::new(element, "Missing component type attribute."));
            }
            (Some(classname), None) => builder = builder.classname(classname),
            (None, Some(base)) => {
                if !is_uri(&base) {
                    return Err(DecodingError::new(
                        element,
                        format!("Unable to parse the base directive uri [{base}]."),
                    ));
                }
                builder = builder.base(base);
            }
        }
        if let Some(name) = resolved(element, "name", resolver) {
            builder = builder.name(name);
        }
        if let Some(value) = resolved(element, "activation", resolver) {
            let policy = ActivationPolicy::parse(&value)
                .map_err(|err| DecodingError::with_source(element, "Invalid activation policy.", err))?;
            builder = builder.activation(policy);
        }
        if let Some(value) = resolved(element, "collection", resolver) {
            let policy = CollectionPolicy::parse(&value)
                .map_err(|err| DecodingError::with_source(element, "Invalid collection policy.", err))?;
            builder = builder.collection(policy);
        }
        if let Some(value) = resolved(element, "lifestyle", resolver) {
            let policy = LifestylePolicy::parse(&value)
                .map_err(|err| DecodingError::with_source(element, "Invalid lifestyle policy.", err))?;
            builder = builder.lifestyle(policy);
        }
        if let Some(categories) = element.child("categories") {
            builder = builder.categories(self.build_categories(categories, resolver)?);
        }
        if let Some(context) = element.child("context") {
            builder = builder.context(self.build_context(context, resolver)?);
        }
        if let Some(parts) = element.child("parts") {
            builder = builder.parts(self.build_parts(parts, resolver)?);
        }
        let directive = builder
            .build()
            .map_err(|err| DecodingError::with_source(element, "Invalid component directive.", err))?;
        tracing::debug!(
            classname = directive.classname(),
            base = directive.base(),
            "decoded component directive"
        );
        Ok(directive)
    }

    /// Builds the part references of a `<parts>` element.
    ///
    /// Each child must be a keyed `<component>`; `priority` defaults to 0.
    ///
    /// # Errors
    ///
    /// Returns [`DecodingError`] for any other child element, a missing key,
    /// or a priority that is not an integer.
    pub fn build_parts(&self, element: &Element, resolver: &dyn Resolver) -> Result<Vec<PartReference>, DecodingError> {
        element
            .children()
            .iter()
            .map(|child| {
                if child.name() != "component" {
                    return Err(DecodingError::new(
                        child,
                        format!("Component part element name [{}] is not recognized.", child.name()),
                    ));
                }
                let key = resolver.resolve(child.required_attribute("key")?);
                let priority = match resolved(child, "priority", resolver) {
                    Some(value) => value
                        .trim()
                        .parse::<i32>()
                        .map_err(|err| DecodingError::with_source(child, "Unable to parse priority value.", err))?,
                    None => 0,
                };
                let directive = self.build_component(child, resolver)?;
                let part = PartReference::new(key, directive)
                    .map_err(|err| DecodingError::with_source(child, "Invalid part reference.", err))?;
                Ok(part.with_priority(priority))
            })
            .collect()
    }

    /// Builds a context directive from a `<context>` element.
    ///
    /// # Errors
    ///
    /// Returns [`DecodingError`] for unrecognized children, missing keys, or
    /// malformed values.
    pub fn build_context(&self, element: &Element, resolver: &dyn Resolver) -> Result<ContextDirective, DecodingError> {
        let classname = resolved(element, "class", resolver);
        let entries = element
            .children()
            .iter()
            .map(|child| {
                let key = resolver.resolve(child.required_attribute("key")?);
                let directive: Directive = match child.name() {
                    "entry" => match resolved(child, "lookup", resolver) {
                        Some(service) => LookupDirective::new(service).into(),
                        None => self.build_value(child, resolver)?.into(),
                    },
                    "lookup" => {
                        let service = child.required_attribute("class")?;
                        LookupDirective::new(resolver.resolve(service)).into()
                    }
                    "context" => self.build_context(child, resolver)?.into(),
                    other => {
                        return Err(DecodingError::new(
                            child,
                            format!("Context entry element [{other}] is not recognized."),
                        ));
                    }
                };
                PartReference::new(key, directive)
                    .map_err(|err| DecodingError::with_source(child, "Invalid context entry.", err))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ContextDirective::new(classname, entries))
    }

    /// Builds a value from an `<entry>` or `<param>` element.
    ///
    /// Nested `<param>` elements make a compound value; otherwise the
    /// `value` attribute is the literal.
    ///
    /// # Errors
    ///
    /// Returns [`DecodingError`] for children other than `<param>` or when
    /// both a literal and parameters are declared.
    pub fn build_value(&self, element: &Element, resolver: &dyn Resolver) -> Result<ValueDirective, DecodingError> {
        let params = element
            .children()
            .iter()
            .map(|child| {
                if child.name() == "param" {
                    self.build_value(child, resolver)
                } else {
                    Err(DecodingError::new(
                        child,
                        format!("Value element [{}] is not recognized.", child.name()),
                    ))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        let literal = resolved(element, "value", resolver);
        let mut value = match (literal, params.is_empty()) {
            (Some(_), false) => {
                return Err(DecodingError::new(
                    element,
                    "A value cannot declare both a literal and parameters.",
                ));
            }
            (Some(literal), true) => ValueDirective::literal(literal),
            (None, false) => ValueDirective::compound(params),
            (None, true) => ValueDirective::default(),
        };
        if let Some(classname) = resolved(element, "class", resolver) {
            value = value.with_classname(classname);
        }
        if let Some(method) = resolved(element, "method", resolver) {
            value = value.with_method(method);
        }
        Ok(value)
    }

    /// Builds a category group, recursing into nested groups.
    ///
    /// # Errors
    ///
    /// Returns [`DecodingError`] for an unparseable priority or a leaf
    /// category without a name.
    pub fn build_categories(
        &self,
        element: &Element,
        resolver: &dyn Resolver,
    ) -> Result<CategoriesDirective, DecodingError> {
        let mut group = CategoriesDirective::new();
        if let Some(name) = resolved(element, "name", resolver) {
            group = group.with_name(name);
        }
        if let Some(priority) = priority(element, resolver)? {
            group = group.with_priority(priority);
        }
        if let Some(target) = resolved(element, "target", resolver) {
            group = group.with_target(target);
        }
        for child in element.children() {
            group = if child.name() == "category" {
                let mut category = CategoryDirective::new(resolver.resolve(child.required_attribute("name")?));
                if let Some(priority) = priority(child, resolver)? {
                    category = category.with_priority(priority);
                }
                if let Some(target) = resolved(child, "target", resolver) {
                    category = category.with_target(target);
                }
                group.with_category(category)
            } else {
                group.with_group(self.build_categories(child, resolver)?)
            };
        }
        Ok(group)
    }
}

fn resolved(element: &Element, name: &str, resolver: &dyn Resolver) -> Option<String> {
    element.attribute(name).map(|value| resolver.resolve(value))
}

fn priority(element: &Element, resolver: &dyn Resolver) -> Result<Option<Priority>, DecodingError> {
    resolved(element, "priority", resolver)
        .map(|value| {
            Priority::parse(&value)
                .map_err(|err| DecodingError::with_source(element, "Invalid category priority.", err))
        })
        .transpose()
}

fn local_path(uri: &str) -> Result<&str, LoadCause> {
    if let Some(path) = uri.strip_prefix("file://") {
        return Ok(path);
    }
    if let Some(path) = uri.strip_prefix("file:") {
        return Ok(path);
    }
    match uri.split_once(':') {
        // a single letter before the colon is a drive, not a scheme
        Some((scheme, _)) if scheme.len() > 1 && is_uri(uri) => Err(LoadCause::UnsupportedScheme(scheme.to_string())),
        _ => Ok(uri),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_file_uris_to_paths() {
        assert_eq!(local_path("file:///tmp/w.xml").unwrap(), "/tmp/w.xml");
        assert_eq!(local_path("file:w.xml").unwrap(), "w.xml");
        assert_eq!(local_path("C:/w.xml").unwrap(), "C:/w.xml");
        assert!(matches!(
            local_path("http://acme/w.xml"),
            Err(LoadCause::UnsupportedScheme(scheme)) if scheme == "http"
        ));
    }
}
