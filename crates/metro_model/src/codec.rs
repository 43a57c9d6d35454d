//! Serialized parts.
//!
//! A built [`Type`](crate::info::Type) or
//! [`ComponentDirective`](crate::data::ComponentDirective) is persisted as
//! JSON so that deployment tooling can load it without re-running
//! introspection or XML decoding.

use crate::error::CodecError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Encodes a part as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`CodecError`] if serialization fails.
pub fn encode<T: Serialize>(part: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(part)?)
}

/// Decodes a part from JSON.
///
/// # Errors
///
/// Returns [`CodecError`] if the text is not a valid encoding of `T`.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    let part = serde_json::from_str(text)?;
    tracing::debug!(part = core::any::type_name::<T>(), "decoded serialized part");
    Ok(part)
}
