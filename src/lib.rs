//! Component type descriptors, lifecycle state graphs, and the builders that
//! produce them.
//!
//! ```
//! use metro::prelude::*;
//!
//! let directive = ComponentDecoder::new()
//!     .parse_str(r#"<component type="acme.Widget" name="widget"/>"#)
//!     .unwrap();
//! assert_eq!(directive.name(), Some("widget"));
//! ```

pub use metro_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use metro_internal::prelude::*;
}
