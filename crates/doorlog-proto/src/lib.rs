//! Wire format for the Door Lock Logging command class.
//!
//! A frame is a two-byte envelope (command class id, command id) followed by
//! a command-specific payload. Four commands exist: the controller asks how
//! many audit records the lock keeps (`RecordsSupportedGet`), the lock answers
//! with a count (`RecordsSupportedReport`), the controller asks for one record
//! (`RecordGet`) and the lock answers with the record (`RecordReport`).
//!
//! Decoding is dispatched through a fixed command -> decoder table, so there
//! is no runtime registration. Every decoder checks the payload length before
//! it reads a field and never partially decodes.
//!
//! # Security
//!
//! The fixed 11-byte record prefix is read through a compile-time verified
//! `zerocopy` layout. The trailing user code is length-prefixed and capped at
//! [`payloads::MAX_USER_CODE_LEN`] bytes.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod event_type;
pub mod frame;
pub mod opcodes;
pub mod payloads;

pub use errors::{ProtocolError, Result};
pub use event_type::{EventType, label_for};
pub use frame::Frame;
pub use opcodes::{COMMAND_CLASS_ID, Command};
pub use payloads::{
    DoorLockLoggingRecord, LATEST_RECORD_NUMBER, LogMessage, MAX_USER_CODE_LEN, Payload, RecordGet,
    RecordReport, RecordStatus, RecordsSupportedGet, RecordsSupportedReport, UserCode,
};
