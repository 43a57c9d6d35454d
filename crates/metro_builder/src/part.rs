//! Serialized parts tagged with their handler and builder.

use crate::config::BuilderConfig;
use crate::error::BuildError;
use metro_model::codec;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct PartEnvelope<S, T> {
    handler: S,
    builder: S,
    part: T,
}

/// Serializes `part` together with the configured handler and builder URIs.
///
/// # Errors
///
/// Returns [`BuildError::Codec`] if the part cannot be serialized.
pub fn export_part<T: Serialize>(config: &BuilderConfig, part: &T) -> Result<String, BuildError> {
    let envelope = PartEnvelope {
        handler: config.part_handler_uri(),
        builder: config.part_builder_uri(),
        part,
    };
    Ok(codec::encode(&envelope)?)
}

/// Reads a part written by [`export_part`].
///
/// # Errors
///
/// Returns [`BuildError::Codec`] for malformed text and
/// [`BuildError::HandlerMismatch`] when the part names a handler other than
/// the configured one.
pub fn import_part<T: DeserializeOwned>(config: &BuilderConfig, text: &str) -> Result<T, BuildError> {
    let envelope: PartEnvelope<String, T> = codec::decode(text)?;
    if envelope.handler != config.part_handler_uri() {
        return Err(BuildError::HandlerMismatch {
            expected: config.part_handler_uri().to_string(),
            found: envelope.handler,
        });
    }
    tracing::debug!(builder = %envelope.builder, "imported part");
    Ok(envelope.part)
}
