//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when working with the UART audio protocol.
///
/// Checksum mismatches are deliberately absent: the frame decoder recovers
/// from them locally by resynchronizing on the next header, so they are
/// logged rather than propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Payload does not fit in the 16-bit length field.
    #[error("payload too large: maximum {max} bytes, got {actual}")]
    PayloadTooLarge {
        /// Maximum representable payload length.
        max: usize,
        /// Actual payload length.
        actual: usize,
    },

    /// Unknown audio format tag.
    #[error("unknown audio format tag: 0x{0:02X}")]
    UnknownFormat(u8),
}
