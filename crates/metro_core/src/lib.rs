//! Runtime plumbing shared by Metro tools.
//!
//! Library crates in the workspace only emit `tracing` events. Binaries call
//! [`TracingConfig::init`] once to install a subscriber that renders them.

mod tracing_setup;

pub use tracing_setup::{TracingConfig, TracingFormat};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::{TracingConfig, TracingFormat};
}
