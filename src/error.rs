//! # Error Types
//!
//! Error handling for every codec operation in the crate.
//!
//! Any error aborts the decode or encode of the packet in progress. There is no
//! partial-result recovery: a caller that receives an error must discard the packet
//! and treat the connection as having violated the protocol.
//!
//! ## Error Categories
//! - **Buffer Errors**: underruns, corrupt varints, trailing bytes, oversized lengths
//! - **Registry Errors**: unknown packet identifiers
//! - **Value Errors**: unknown enum discriminants, malformed legacy tree values,
//!   out-of-range bit indices, invalid UTF-8
//! - **Encode Errors**: required fields that were not supplied
//! - **Configuration Errors**: invalid TOML or failed validation
//!
//! ## Example Usage
//! ```rust
//! use bedrock_protocol::error::{ProtocolError, Result};
//! use bedrock_protocol::core::binary::BinaryReader;
//! use tracing::{error, info};
//!
//! fn first_varint(bytes: &[u8]) -> Result<u32> {
//!     let mut reader = BinaryReader::new(bytes);
//!     reader.get_var_u32()
//! }
//!
//! match first_varint(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]) {
//!     Ok(value) => info!(value, "decoded"),
//!     Err(e @ ProtocolError::CorruptVarint { .. }) => error!(error = %e, "bad varint"),
//!     Err(e) => error!(error = %e, "decode failed"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Legacy tree validation messages
    pub const ERR_VECTOR_NOT_LIST: &str = "should be a list of floats";
    pub const ERR_VECTOR_LENGTH: &str = "expected exactly 3 entries";
    pub const ERR_NON_FINITE_NAN: &str = "contains invalid NaN value";
    pub const ERR_NON_FINITE_INF: &str = "contains invalid infinite value";

    /// Tree codec messages
    pub const ERR_NBT_ROOT_NOT_COMPOUND: &str = "root tag must be a compound";
    pub const ERR_NBT_TOO_DEEP: &str = "tree nesting exceeds maximum depth";
    pub const ERR_NBT_MIXED_LIST: &str = "list elements must share one tag type";

    /// Item stack messages
    pub const ERR_ITEM_NBT_MARKER: &str = "unexpected item NBT length marker";
    pub const ERR_ITEM_NBT_VERSION: &str = "unsupported item NBT version";

    /// Login data messages
    pub const ERR_MALFORMED_BASE64: &str = "malformed base64, cannot be decoded";
}

/// ProtocolError is the single error type for all codec operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Buffer underrun: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun { needed: usize, remaining: usize },

    #[error("Corrupt varint: continuation exceeds {max_bytes} bytes")]
    CorruptVarint { max_bytes: usize },

    #[error("Unknown packet id: {0:#x}")]
    UnknownPacketId(u32),

    #[error("Unknown {kind} value: {value}")]
    UnknownEnumValue { kind: &'static str, value: i64 },

    #[error("Malformed structural value: {0}")]
    MalformedStructuralValue(String),

    #[error("Required field missing: {field} ({reason})")]
    RequiredFieldMissing {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Bit index {index} out of range for bitset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid UTF-8 in string field")]
    InvalidUtf8,

    #[error("{kind} length {len} exceeds maximum {max}")]
    OversizedValue {
        kind: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{remaining} unread bytes after decoding {packet}")]
    TrailingBytes {
        packet: &'static str,
        remaining: usize,
    },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProtocolError {
    /// Shorthand for a legacy-tree validation failure.
    pub fn malformed(message: impl Into<String>) -> Self {
        ProtocolError::MalformedStructuralValue(message.into())
    }

    /// True for errors caused by the bytes on the wire rather than by local misuse.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            ProtocolError::BufferUnderrun { .. }
                | ProtocolError::CorruptVarint { .. }
                | ProtocolError::UnknownPacketId(_)
                | ProtocolError::UnknownEnumValue { .. }
                | ProtocolError::MalformedStructuralValue(_)
                | ProtocolError::InvalidUtf8
                | ProtocolError::OversizedValue { .. }
                | ProtocolError::TrailingBytes { .. }
        )
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::Json(err.to_string())
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_classification() {
        assert!(ProtocolError::CorruptVarint { max_bytes: 5 }.is_decode_error());
        assert!(ProtocolError::UnknownPacketId(0x3ff).is_decode_error());
        assert!(!ProtocolError::RequiredFieldMissing {
            field: "vr_gaze_direction",
            reason: "VR play mode",
        }
        .is_decode_error());
        assert!(!ProtocolError::ConfigError("bad".into()).is_decode_error());
    }

    #[test]
    fn test_display_messages() {
        let err = ProtocolError::BufferUnderrun {
            needed: 4,
            remaining: 1,
        };
        assert_eq!(
            err.to_string(),
            "Buffer underrun: needed 4 bytes, 1 remaining"
        );
        assert_eq!(
            ProtocolError::UnknownPacketId(0x90).to_string(),
            "Unknown packet id: 0x90"
        );
    }
}
