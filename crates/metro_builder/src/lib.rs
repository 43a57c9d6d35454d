//! Builders that turn implementation classes and XML declarations into
//! Metro descriptors and directives.
//!
//! # Introspection
//!
//! [`TypeIntrospector`] reads the shape of an implementation class (a
//! [`ClassDescriptor`], usually supplied through [`Introspect`] or a
//! [`ClassLoader`]) and synthesizes a [`Type`](metro_model::info::Type):
//!
//! - a nested `$Context` interface yields the context entries, one per
//!   `get<Key>` accessor (no argument: required; one default-value argument:
//!   optional),
//! - a nested `$Parts` interface yields part accessor descriptors,
//! - `TYPE_CONFIGURATION_SCHEMA` and `TYPE_INFO_PROPERTIES` static fields
//!   feed the info descriptor,
//! - the `<class path>.xgraph` resource supplies the lifecycle graph, or the
//!   null graph when absent.
//!
//! # Decoding
//!
//! [`ComponentDecoder`] reads `<component>` directives, [`TypeDecoder`]
//! reads `.type` documents, and the matching encoders write them back.

mod class;
mod config;
mod configuration;
mod decoder;
mod encoder;
mod error;
mod graph;
mod introspect;
mod loader;
mod part;
mod resolver;
mod types;

pub use class::{ClassDescriptor, FieldDescriptor, FieldValue, Introspect, MethodDescriptor, TypeRef};
pub use config::{
    BuilderConfig, DEFAULT_COMPONENT_NAMESPACE, DEFAULT_PART_BUILDER_URI, DEFAULT_PART_HANDLER_URI,
};
pub use configuration::Configuration;
pub use decoder::ComponentDecoder;
pub use encoder::ComponentEncoder;
pub use error::{BuildError, DecodeError, EncodeError, IntrospectionError, LoadCause, LoadError};
pub use graph::StateResolver;
pub use introspect::TypeIntrospector;
pub use loader::{ClassLoader, ClassPath, Resource};
pub use part::{export_part, import_part};
pub use resolver::{PropertyResolver, Resolver};
pub use types::{DEFAULT_TYPE_NAMESPACE, TypeDecoder, TypeEncoder};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::{
        BuilderConfig, ClassDescriptor, ClassLoader, ClassPath, ComponentDecoder,
        ComponentEncoder, Introspect, MethodDescriptor, StateResolver, TypeDecoder, TypeEncoder,
        TypeIntrospector,
    };
}
