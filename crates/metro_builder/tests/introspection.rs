//! Type introspection from class shapes.

use metro_builder::{
    BuildError, BuilderConfig, ClassDescriptor, ClassLoader, ClassPath, FieldDescriptor, FieldValue, Introspect,
    IntrospectionError, MethodDescriptor, TypeIntrospector,
};
use metro_model::info::{Attributes, EntryDescriptor, Postfix, Requirement, Semantic, ServiceDescriptor};
use metro_model::{LifestylePolicy, Version};
use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

struct Widget;

impl Introspect for Widget {
    fn class_descriptor() -> ClassDescriptor {
        ClassDescriptor::class("acme.Widget")
            .implements("acme.WidgetService")
            .implements("java.io.Serializable")
            .implements("acme.Widget$Context")
            .inner(
                ClassDescriptor::interface("acme.Widget$Context")
                    .method(MethodDescriptor::new("getHost").returns("java.lang.String"))
                    .method(MethodDescriptor::new("getPort").returns("int").param("int")),
            )
    }
}

fn widget_path() -> ClassPath {
    ClassPath::new()
        .with_class(Widget::class_descriptor())
        .with_root(fixtures())
}

fn context_class(methods: Vec<MethodDescriptor>) -> ClassDescriptor {
    let context = methods
        .into_iter()
        .fold(ClassDescriptor::interface("acme.Probe$Context"), ClassDescriptor::method);
    ClassDescriptor::class("acme.Probe").inner(context)
}

fn parts_class(methods: Vec<MethodDescriptor>) -> ClassDescriptor {
    let parts = methods
        .into_iter()
        .fold(ClassDescriptor::interface("acme.Probe$Parts"), ClassDescriptor::method);
    ClassDescriptor::class("acme.Probe").inner(parts)
}

fn introspection_error(result: Result<impl core::fmt::Debug, BuildError>) -> IntrospectionError {
    match result {
        Err(BuildError::Introspection { source, .. }) => source,
        other => panic!("expected an introspection error, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context entries
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn widget_entries_follow_declaration_order() {
    let loader = widget_path();
    let widget = TypeIntrospector::new().build_type_of::<Widget>(&loader).unwrap();
    assert_eq!(
        widget.context().entries(),
        [
            EntryDescriptor::new("host", "java.lang.String", Requirement::Required),
            EntryDescriptor::new("port", "int", Requirement::Optional),
        ]
    );
    assert_eq!(widget.context().classname(), Some("acme.Widget$Context"));
}

#[test]
fn single_accessor_is_required() {
    let class = context_class(vec![MethodDescriptor::new("getFoo").returns("acme.Foo")]);
    let context = TypeIntrospector::new()
        .create_context_descriptor(&class, &ClassPath::new())
        .unwrap();
    assert_eq!(context.entries().len(), 1);
    let entry = &context.entries()[0];
    assert_eq!(entry.key(), "foo");
    assert_eq!(entry.classname(), "acme.Foo");
    assert!(entry.is_required());
}

#[test]
fn default_overload_makes_the_entry_optional() {
    let class = context_class(vec![
        MethodDescriptor::new("getFoo").returns("acme.Foo"),
        MethodDescriptor::new("getFoo").returns("acme.Foo").param("acme.Foo"),
    ]);
    let context = TypeIntrospector::new()
        .create_context_descriptor(&class, &ClassPath::new())
        .unwrap();
    assert_eq!(context.entries(), [EntryDescriptor::optional("foo", "acme.Foo")]);
}

#[test]
fn optional_default_may_be_a_subtype() {
    let loader = ClassPath::new().with_class(ClassDescriptor::class("acme.RedFoo").extends("acme.Foo"));
    let class = context_class(vec![MethodDescriptor::new("getFoo").returns("acme.Foo").param("acme.RedFoo")]);
    let context = TypeIntrospector::new().create_context_descriptor(&class, &loader).unwrap();
    assert_eq!(context.entries(), [EntryDescriptor::optional("foo", "acme.RedFoo")]);
}

#[test]
fn class_without_context_has_no_entries() {
    let class = ClassDescriptor::class("acme.Plain");
    let context = TypeIntrospector::new()
        .create_context_descriptor(&class, &ClassPath::new())
        .unwrap();
    assert!(context.entries().is_empty());
    assert_eq!(context.classname(), None);
}

#[test]
fn non_accessor_methods_are_ignored() {
    let class = context_class(vec![
        MethodDescriptor::new("toString").returns("java.lang.String"),
        MethodDescriptor::new("getName").returns("java.lang.String"),
    ]);
    let context = TypeIntrospector::new()
        .create_context_descriptor(&class, &ClassPath::new())
        .unwrap();
    assert_eq!(context.entries().len(), 1);
}

#[test]
fn rejects_broken_context_accessors() {
    let cases = [
        (MethodDescriptor::new("getFoo"), "void"),
        (MethodDescriptor::new("getFoo").returns("acme.Foo[]"), "array"),
        (MethodDescriptor::new("getFoo").returns("acme.Foo").throws("java.io.IOException"), "exceptions"),
        (
            MethodDescriptor::new("getFoo").returns("acme.Foo").param("acme.Foo").param("int"),
            "pattern",
        ),
        (MethodDescriptor::new("getFoo").returns("int").param("java.lang.String"), "assignable"),
        (MethodDescriptor::new("get").returns("int"), "key"),
    ];
    for (method, label) in cases {
        let class = context_class(vec![method]);
        let err = TypeIntrospector::new()
            .create_context_descriptor(&class, &ClassPath::new())
            .unwrap_err();
        let matched = match label {
            "void" | "array" => matches!(err, IntrospectionError::IllegalReturnType { .. }),
            "exceptions" => matches!(err, IntrospectionError::DeclaresExceptions { .. }),
            "pattern" => matches!(err, IntrospectionError::UnrecognizedPattern { .. }),
            "assignable" => matches!(err, IntrospectionError::NotAssignable { .. }),
            _ => matches!(err, IntrospectionError::EmptyKey { .. }),
        };
        assert!(matched, "{label}: unexpected {err:?}");
        assert!(err.to_string().contains("get"), "{label}: {err}");
    }
}

#[test]
fn unassignable_default_names_both_types() {
    let class = context_class(vec![MethodDescriptor::new("getPort").returns("int").param("java.lang.String")]);
    let err = TypeIntrospector::new()
        .create_context_descriptor(&class, &ClassPath::new())
        .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Context entry assessor declares an optional default parameter class [java.lang.String]"));
    assert!(message.contains("return type [int]"));
}

#[test]
fn conflicting_defaults_are_rejected() {
    let class = context_class(vec![
        MethodDescriptor::new("getFoo").returns("java.lang.Object").param("acme.A"),
        MethodDescriptor::new("getFoo").returns("java.lang.Object").param("acme.B"),
    ]);
    let err = TypeIntrospector::new()
        .create_context_descriptor(&class, &ClassPath::new())
        .unwrap_err();
    assert!(matches!(err, IntrospectionError::ConflictingEntry { ref key, .. } if key == "foo"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Parts
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn groups_part_accessors_by_key() {
    let class = parts_class(vec![
        MethodDescriptor::new("getCache").returns("acme.Cache"),
        MethodDescriptor::new("getCache").returns("acme.Cache").param("boolean"),
        MethodDescriptor::new("getCacheComponent").returns("acme.Component"),
        MethodDescriptor::new("getStoreContextMap").returns("java.util.Map"),
        MethodDescriptor::new("releaseCache").param("acme.Cache"),
    ]);
    let parts = TypeIntrospector::new().create_part_descriptors(&class).unwrap();
    let keys: Vec<_> = parts.iter().map(|part| part.key()).collect();
    assert_eq!(keys, ["cache", "store"]);

    let cache = &parts[0];
    assert_eq!(cache.operations().len(), 4);
    assert!(cache.operations()[1].is_select());
    assert_eq!(
        cache.operation(Semantic::Get, Some(Postfix::Component)).map(|op| op.classname()),
        Some("acme.Component")
    );
    let release = cache.operation(Semantic::Release, None).unwrap();
    assert_eq!(release.classname(), "acme.Cache");
    assert_eq!(parts[1].operations()[0].postfix(), Some(Postfix::ContextMap));
}

#[test]
fn rejects_broken_part_accessors() {
    let reject = |method: MethodDescriptor| {
        TypeIntrospector::new()
            .create_part_descriptors(&parts_class(vec![method]))
            .unwrap_err()
    };

    assert!(matches!(
        reject(MethodDescriptor::new("fetchCache").returns("acme.Cache")),
        IntrospectionError::UnrecognizedPartAccessor { .. }
    ));
    assert!(matches!(
        reject(MethodDescriptor::new("getCache")),
        IntrospectionError::IllegalPartAccessor { ref key, .. } if key == "cache"
    ));
    assert!(matches!(
        reject(MethodDescriptor::new("getCache").returns("acme.Cache[]")),
        IntrospectionError::IllegalPartAccessor { .. }
    ));
    assert!(matches!(
        reject(MethodDescriptor::new("getCache").returns("acme.Cache").param("int")),
        IntrospectionError::NonBooleanSelect { .. }
    ));
    assert!(matches!(
        reject(MethodDescriptor::new("releaseCache").param("acme.Cache").returns("boolean")),
        IntrospectionError::IllegalPartAccessor { .. }
    ));
    assert!(matches!(
        reject(MethodDescriptor::new("releaseCache")),
        IntrospectionError::IllegalPartAccessor { .. }
    ));
    assert!(matches!(
        reject(MethodDescriptor::new("releaseCache").param("acme.Cache[]")),
        IntrospectionError::IllegalPartAccessor { .. }
    ));
}

#[test]
fn non_boolean_select_message_names_the_component() {
    let class = parts_class(vec![MethodDescriptor::new("getCache").returns("acme.Cache").param("int")]);
    let err = TypeIntrospector::new().create_part_descriptors(&class).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Part accessor [acme.Probe#getCache] is declaring an illegal non-boolean parameter."
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Static markers and info
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn static_markers_feed_the_info_descriptor() {
    let class = ClassDescriptor::class("acme.Marked")
        .field(FieldDescriptor::constant(
            "TYPE_CONFIGURATION_SCHEMA",
            "java.lang.String",
            FieldValue::Text("urn:acme:marked".into()),
        ))
        .field(FieldDescriptor::constant(
            "TYPE_INFO_PROPERTIES",
            "java.util.Properties",
            FieldValue::Properties(Attributes::new().with("vendor", "acme")),
        ));
    let info = TypeIntrospector::new()
        .create_info_descriptor(&class, &ClassPath::new())
        .unwrap();
    assert_eq!(info.configuration_schema(), Some("urn:acme:marked"));
    assert_eq!(info.attributes().get("vendor"), Some("acme"));
}

#[test]
fn instance_marker_fields_are_ignored() {
    let class = ClassDescriptor::class("acme.Marked").field(FieldDescriptor::new(
        "TYPE_CONFIGURATION_SCHEMA",
        "java.lang.Integer",
    ));
    let info = TypeIntrospector::new()
        .create_info_descriptor(&class, &ClassPath::new())
        .unwrap();
    assert_eq!(info.configuration_schema(), None);
}

#[test]
fn mistyped_markers_fail() {
    let class = ClassDescriptor::class("acme.Marked").field(FieldDescriptor::constant(
        "TYPE_CONFIGURATION_SCHEMA",
        "java.lang.Integer",
        FieldValue::Null,
    ));
    let err = introspection_error(TypeIntrospector::new().create_info_descriptor(&class, &ClassPath::new()));
    assert_eq!(
        err.to_string(),
        "The component type [acme.Marked] declares an invalid static field TYPE_CONFIGURATION_SCHEMA declaration. The declared type is not assignable to a string."
    );

    let class = ClassDescriptor::class("acme.Marked").field(FieldDescriptor::constant(
        "TYPE_INFO_PROPERTIES",
        "java.util.Properties",
        FieldValue::Text("vendor=acme".into()),
    ));
    let err = introspection_error(TypeIntrospector::new().create_info_descriptor(&class, &ClassPath::new()));
    assert!(matches!(err, IntrospectionError::InvalidStaticValue { field: "TYPE_INFO_PROPERTIES", .. }));
}

#[test]
fn overrides_shape_the_info_descriptor() {
    let loader = widget_path();
    let widget = TypeIntrospector::new()
        .with_name("front")
        .with_version(Version::new(2, 0, 1))
        .with_threadsafe(true)
        .build_type_of::<Widget>(&loader)
        .unwrap();
    let info = widget.info();
    assert_eq!(info.name(), "front");
    assert_eq!(info.version(), Version::new(2, 0, 1));
    assert_eq!(info.lifestyle(), LifestylePolicy::Singleton);

    let transient = TypeIntrospector::new().build_type_of::<Widget>(&loader).unwrap();
    assert_eq!(transient.info().name(), "widget");
    assert_eq!(transient.info().lifestyle(), LifestylePolicy::Transient);
}

// ─────────────────────────────────────────────────────────────────────────────
// Services
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn discovers_services_across_the_superclass_chain() {
    let loader = ClassPath::new()
        .with_class(
            ClassDescriptor::class("acme.Base")
                .implements("acme.Startable")
                .implements("acme.Base$Listener")
                .implements("acme.WidgetService")
                .inner(ClassDescriptor::interface("acme.Base$Listener")),
        )
        .with_class(
            ClassDescriptor::class("acme.Widget")
                .extends("acme.Base")
                .implements("acme.WidgetService")
                .implements("javax.management.MBean")
                .implements("acme.Widget$Context")
                .inner(ClassDescriptor::interface("acme.Widget$Context")),
        );
    let class = loader.load_class("acme.Widget").unwrap();
    let services = TypeIntrospector::new().create_service_descriptors(class, &loader);
    let names: Vec<_> = services.iter().map(ServiceDescriptor::classname).collect();
    assert_eq!(names, ["acme.WidgetService", "acme.Startable"]);
}

#[test]
fn configured_exclusions_and_explicit_services() {
    let loader = widget_path();
    let class = Widget::class_descriptor();
    let config = BuilderConfig::new().with_excluded_service_prefix("acme.Widget");
    let none = TypeIntrospector::new()
        .with_config(config)
        .create_service_descriptors(&class, &loader);
    assert!(none.is_empty());

    let explicit = vec![ServiceDescriptor::new("acme.Other")];
    let built = TypeIntrospector::new()
        .with_services(explicit.clone())
        .build_type(&class, &loader)
        .unwrap();
    assert_eq!(built.services(), explicit.as_slice());
}

// ─────────────────────────────────────────────────────────────────────────────
// Resources
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn widget_graph_and_configuration_come_from_resources() {
    let loader = widget_path();
    let introspector = TypeIntrospector::new();
    let widget = introspector.build_type_of::<Widget>(&loader).unwrap();
    let graph = widget.state_graph();
    assert!(!graph.is_null());
    assert!(graph.state("available").is_some());

    let config = introspector
        .default_configuration(&Widget::class_descriptor(), &loader)
        .unwrap()
        .unwrap();
    assert_eq!(config.child("pool").and_then(|pool| pool.attribute("size")), Some("4"));
}

#[test]
fn missing_configuration_is_none() {
    let class = ClassDescriptor::class("acme.Plain");
    let config = TypeIntrospector::new()
        .default_configuration(&class, &ClassPath::new().with_root(fixtures()))
        .unwrap();
    assert!(config.is_none());
}

#[test]
fn malformed_configuration_names_the_resource() {
    let class = ClassDescriptor::class("acme.Plain");
    let loader = ClassPath::new().with_resource("acme/Plain.xconfig", "<configuration>");
    let err = TypeIntrospector::new().default_configuration(&class, &loader).unwrap_err();
    assert!(matches!(err, BuildError::Configuration { ref resource, .. } if resource.ends_with("acme/Plain.xconfig")));
}

#[test]
fn build_by_classname() {
    let loader = widget_path();
    let built = TypeIntrospector::new()
        .with_classname("acme.Widget")
        .build(&loader)
        .unwrap();
    assert_eq!(built.info().classname(), "acme.Widget");

    assert!(matches!(TypeIntrospector::new().build(&loader), Err(BuildError::MissingClassname)));
    assert!(matches!(
        TypeIntrospector::new().with_classname("acme.Nope").build(&loader),
        Err(BuildError::ClassNotFound(name)) if name == "acme.Nope"
    ));
}
