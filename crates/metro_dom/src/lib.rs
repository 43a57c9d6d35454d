//! XML element tree for Metro descriptors.
//!
//! Every external declaration Metro consumes (component directives, state
//! graphs, type documents, default configurations) is a small XML document.
//! This crate parses such documents into an owned [`Element`] tree, offers
//! the lookup helpers the decoders share, and provides [`XmlWriter`] for the
//! encoders that produce the same shapes.
//!
//! # Example
//!
//! ```
//! use metro_dom::Element;
//!
//! let root = Element::parse_str(r#"<component type="acme.Widget"><parts/></component>"#).unwrap();
//! assert_eq!(root.name(), "component");
//! assert_eq!(root.attribute("type"), Some("acme.Widget"));
//! assert!(root.child("parts").is_some());
//! ```

mod element;
mod error;
mod writer;

pub use element::Element;
pub use error::{DecodingError, DomError};
pub use writer::XmlWriter;
