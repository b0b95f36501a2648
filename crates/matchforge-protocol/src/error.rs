//! Error types for the protocol layer.
//!
//! Each crate in Matchforge defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is in how a value was encoded or
//! decoded, not in room bookkeeping or authentication.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into JSON).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning JSON back into a Rust value).
    ///
    /// Common causes: a tampered cookie, a truncated value, or a number
    /// where a string was expected.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The value parsed but violates a protocol rule, for example an
    /// unknown cancel reason or a non-numeric game id.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
