//! # Metro Internal Library
//!
//! Re-exports the core Metro crates for convenience.

/// Layer 0: subscriber setup.
pub use metro_core;

/// Layer 0: XML element tree and writer.
pub use metro_dom;

/// Layer 1: lifecycle state graphs.
pub use metro_state;

/// Layer 1: type descriptors and deployment directives.
pub use metro_model;

/// Layer 2: introspection, resolution, and directive decoding.
pub use metro_builder;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use metro_builder::prelude::*;
    pub use metro_core::prelude::*;
    pub use metro_model::prelude::*;
    pub use metro_state::prelude::*;
}
