//! Error types for the protocol layer.
//!
//! Every crate in the workspace owns its error enum. A `ProtocolError`
//! always means the bytes or the JSON document were the problem, never the
//! network or a domain rule.

/// Errors that can occur while encoding or decoding wire documents.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes or JSON).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed.
    ///
    /// Common causes: malformed JSON, a missing required field such as
    /// `access_token`, or a field with the wrong type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The document parsed but violates a protocol rule.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}
