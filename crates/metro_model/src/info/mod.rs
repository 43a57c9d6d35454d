//! Component type descriptors.
//!
//! Everything here is immutable once built and describes one facet of a
//! component implementation class. [`Type`] ties the facets together.

mod attributes;
mod category;
mod context;
mod descriptor;
mod part;
mod service;
mod types;

pub use attributes::Attributes;
pub use category::CategoryDescriptor;
pub use context::{ContextDescriptor, EntryDescriptor, Requirement};
pub use descriptor::{InfoDescriptor, InfoDescriptorBuilder};
pub use part::{PartDescriptor, PartOperation, Postfix, Semantic};
pub use service::ServiceDescriptor;
pub use types::{Type, TypeBuilder};
