//! Component type descriptors and deployment directives.
//!
//! Two families of immutable value types live here:
//!
//! - **[`info`]**: the design-time description of one component
//!   implementation. A [`Type`](info::Type) aggregates an
//!   [`InfoDescriptor`](info::InfoDescriptor), the context entries the
//!   component needs, the services it provides, its logging categories, its
//!   part accessors, and its lifecycle [`State`](metro_state::State) graph.
//! - **[`data`]**: deployment directives that say how to configure an
//!   instance: [`ComponentDirective`](data::ComponentDirective) trees with
//!   context entries, nested parts, and category settings.
//!
//! Both share [`PartReference`] and the [`Composite`] lookup contract.
//! Equality and hashing are structural over every field, and sequence
//! fields compare index by index.

pub mod codec;
pub mod data;
pub mod info;

mod composite;
mod error;
mod policy;
mod version;

pub use composite::{Composite, PartReference};
pub use error::{CodecError, DescriptorError, DirectiveError, PolicyError, VersionError};
pub use policy::{ActivationPolicy, CollectionPolicy, LifestylePolicy, Priority};
pub use version::Version;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::data::{
        CategoriesDirective, ComponentDirective, ContextDirective, Directive, LookupDirective,
        ValueDirective,
    };
    pub use crate::info::{
        CategoryDescriptor, ContextDescriptor, EntryDescriptor, InfoDescriptor, PartDescriptor,
        ServiceDescriptor, Type,
    };
    pub use crate::{
        ActivationPolicy, CollectionPolicy, Composite, LifestylePolicy, PartReference, Priority,
        Version,
    };
}
