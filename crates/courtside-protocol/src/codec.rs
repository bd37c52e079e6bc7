//! Codec trait and implementations for serializing wire documents.
//!
//! The gateway moves bytes; the rest of the client wants typed values.
//! A [`Codec`] sits in between. Only [`JsonCodec`] exists today because the
//! authority speaks JSON, but nothing above the gateway depends on that.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust values to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because a codec is stored inside gateways that
/// are shared across tasks through `Arc`.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value cannot be represented.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected shape.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Besides the byte-level trait methods it can convert between typed values
/// and `serde_json::Value`, which is the currency of the gateway contract.
///
/// ```rust
/// use courtside_protocol::{JsonCodec, Codec, Player, PlayerId};
///
/// let codec = JsonCodec;
/// let bytes = br#"{"id": 7, "full_name": "Nikola Jokic"}"#;
///
/// let player: Player = codec.decode(bytes).unwrap();
/// assert_eq!(player.id, PlayerId(7));
/// assert_eq!(player.average_fantasy_points, 0.0);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl JsonCodec {
    /// Converts a typed value into a JSON tree (used for request bodies).
    pub fn to_value<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<serde_json::Value, ProtocolError> {
        serde_json::to_value(value).map_err(ProtocolError::Encode)
    }

    /// Converts a JSON tree returned by the gateway into a typed value.
    pub fn from_value<T: DeserializeOwned>(
        &self,
        value: serde_json::Value,
    ) -> Result<T, ProtocolError> {
        serde_json::from_value(value).map_err(ProtocolError::Decode)
    }
}

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
