//! Type assembly, composite lookup, and serialized part tests.

use metro_model::codec;
use metro_model::data::{ComponentDirective, ContextDirective, Directive, LookupDirective, ValueDirective};
use metro_model::info::{
    CategoryDescriptor, ContextDescriptor, EntryDescriptor, InfoDescriptor, ServiceDescriptor, Type,
};
use metro_model::{Composite, DescriptorError, PartReference, Version};
use metro_state::{State, Transition};
use std::sync::Arc;

fn widget_type() -> Type {
    Type::builder()
        .info(InfoDescriptor::new(None, "acme.Widget").unwrap())
        .categories(vec![CategoryDescriptor::new("http")])
        .context(ContextDescriptor::new(
            Some("acme.Widget$Context".to_string()),
            vec![EntryDescriptor::required("host", "java.lang.String")],
        ))
        .services(vec![
            ServiceDescriptor::new("acme.Gadget").with_version(Version::new(1, 2, 0)),
        ])
        .graph(Arc::new(
            State::root()
                .with_transition(Transition::new("go", "running"))
                .with_state(State::new("running")),
        ))
        .build()
        .unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Construction
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn missing_mandatory_arguments_fail() {
    let info = InfoDescriptor::new(None, "acme.Widget").unwrap();

    let no_info = Type::builder()
        .categories(vec![])
        .context(ContextDescriptor::default())
        .graph(State::null())
        .build();
    assert_eq!(no_info, Err(DescriptorError::MissingArgument("info")));

    let no_categories = Type::builder()
        .info(info.clone())
        .context(ContextDescriptor::default())
        .graph(State::null())
        .build();
    assert_eq!(no_categories, Err(DescriptorError::MissingArgument("categories")));

    let no_context = Type::builder()
        .info(info.clone())
        .categories(vec![])
        .graph(State::null())
        .build();
    assert_eq!(no_context, Err(DescriptorError::MissingArgument("context")));

    let no_graph = Type::builder()
        .info(info)
        .categories(vec![])
        .context(ContextDescriptor::default())
        .build();
    assert_eq!(no_graph, Err(DescriptorError::MissingArgument("graph")));
}

#[test]
fn services_default_to_empty() {
    let ty = Type::builder()
        .info(InfoDescriptor::new(None, "acme.Widget").unwrap())
        .categories(vec![])
        .context(ContextDescriptor::default())
        .graph(State::null())
        .build()
        .unwrap();
    assert!(ty.services().is_empty());
    assert!(ty.part_references().is_empty());
}

#[test]
fn lookups_by_name() {
    let ty = widget_type();
    assert!(ty.is_a_category("http"));
    assert!(!ty.is_a_category("ftp"));
    assert!(ty.service("acme.Gadget").is_some());
    assert!(
        ty.service_matching(&ServiceDescriptor::new("acme.Gadget").with_version(Version::new(1, 1, 0)))
            .is_some()
    );
    assert!(
        ty.service_matching(&ServiceDescriptor::new("acme.Gadget").with_version(Version::new(2, 0, 0)))
            .is_none()
    );
    assert_eq!(ty.to_string(), "[widget] acme.Widget:1.0.0");
}

#[test]
fn object_type_is_degenerate() {
    let object = Type::object_type();
    assert_eq!(object.info().name(), "object");
    assert_eq!(object.info().classname(), "java.lang.Object");
    assert!(object.state_graph().is_null());
    assert!(object.context().entries().is_empty());
    assert!(std::ptr::eq(object, Type::object_type()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Composite lookup
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_composite_has_no_directives() {
    let context = ContextDirective::default();
    assert!(context.directive("anything").is_none());
    assert!(context.part_keys().is_empty());
}

#[test]
fn duplicate_keys_resolve_to_first_occurrence() {
    let first = PartReference::new("dup", ValueDirective::literal("first")).unwrap();
    let second = PartReference::new("dup", ValueDirective::literal("second")).unwrap();
    let context = ContextDirective::new(None, vec![first, second]);

    let directive = context.directive("dup").and_then(Directive::as_value).unwrap();
    assert_eq!(directive.value(), Some("first"));
    assert_eq!(context.part_keys(), vec!["dup", "dup"]);
}

#[test]
fn part_reference_requires_key() {
    assert!(PartReference::new("", LookupDirective::new("acme.Gadget")).is_err());
}

#[test]
fn sequence_fields_compare_in_order() {
    let a = ContextDirective::new(
        None,
        vec![
            PartReference::new("a", LookupDirective::new("x")).unwrap(),
            PartReference::new("b", LookupDirective::new("y")).unwrap(),
        ],
    );
    let b = ContextDirective::new(
        None,
        vec![
            PartReference::new("b", LookupDirective::new("y")).unwrap(),
            PartReference::new("a", LookupDirective::new("x")).unwrap(),
        ],
    );
    assert_ne!(a, b);
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialized parts
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn type_survives_serialization() {
    let ty = widget_type();
    let text = codec::encode(&ty).unwrap();
    let decoded: Type = codec::decode(&text).unwrap();
    assert_eq!(decoded, ty);
}

#[test]
fn component_directive_survives_serialization() {
    let inner = ComponentDirective::new(None, "acme.Gadget").unwrap();
    let directive = ComponentDirective::builder()
        .name("w")
        .classname("acme.Widget")
        .part(PartReference::new("inner", inner).unwrap().with_priority(3))
        .build()
        .unwrap();
    let text = codec::encode(&directive).unwrap();
    assert_eq!(codec::decode::<ComponentDirective>(&text).unwrap(), directive);
}

#[test]
fn malformed_serialized_part_fails() {
    assert!(codec::decode::<Type>("{\"info\": 1}").is_err());
}
