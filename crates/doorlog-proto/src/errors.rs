//! Protocol error types.
//!
//! Data errors (`MalformedFrame`, `UserCodeTooLong`, `UnknownCommand`,
//! `WrongCommandClass`) mean the bytes on the wire are bad. `NotImplemented`
//! means the caller tried to parse a frame that only ever travels outbound,
//! which is a bug in the caller, not in the device.
//!
//! A declared user code length above the cap makes the frame malformed even
//! when enough bytes follow. It is reported as `UserCodeTooLong` so the
//! length is visible; [`ProtocolError::is_malformed`] groups both variants.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding Door Lock Logging frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Payload is shorter than the field layout requires
    #[error("malformed frame: expected at least {expected} bytes, got {actual}")]
    MalformedFrame {
        /// Minimum length the layout requires
        expected: usize,
        /// Actual payload length
        actual: usize,
    },

    /// Declared user code length exceeds the protocol limit
    #[error("user code length {len} exceeds maximum of {max}")]
    UserCodeTooLong {
        /// Declared length
        len: usize,
        /// Protocol limit
        max: usize,
    },

    /// Field value cannot be represented on the wire
    #[error("{field} out of range: {value}")]
    FieldOutOfRange {
        /// Field name
        field: &'static str,
        /// Rejected value
        value: i32,
    },

    /// Frame shape is defined for the outbound direction only
    #[error("{0}: deserialization not implemented")]
    NotImplemented(&'static str),

    /// Command byte is not part of this command class
    #[error("unknown command: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Frame belongs to a different command class
    #[error("wrong command class: 0x{0:02X}")]
    WrongCommandClass(u8),
}

impl ProtocolError {
    /// True for errors caused by bad wire data rather than a caller bug
    pub fn is_data_error(&self) -> bool {
        !matches!(self, Self::NotImplemented(_))
    }

    /// True when a payload violates its field layout: too short, or a
    /// length-prefixed section longer than its bound
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedFrame { .. } | Self::UserCodeTooLong { .. })
    }
}
