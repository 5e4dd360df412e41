//! Audit record query and report.
//!
//! # Wire layout (RecordReport)
//!
//! ```text
//! 0      record number
//! 1..=2  year (big-endian)
//! 3      month
//! 4      day
//! 5      status (bits 7-5) | hour (bits 4-0)
//! 6      minute
//! 7      second
//! 8      event type
//! 9      user id
//! 10     user code length (<= 10)
//! 11..   user code
//! ```
//!
//! When the status bits are 0 the slot is empty and bytes 1..=10 carry no
//! meaning.

use bytes::{BufMut, Bytes, BytesMut};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned, byteorder::big_endian::U16};

use super::{LogMessage, timestamp::DateFields};
use crate::{
    errors::{ProtocolError, Result},
    event_type::label_for,
};

/// Record number that asks for the most recent entry
pub const LATEST_RECORD_NUMBER: u8 = 0;

/// Longest user code a record may carry
pub const MAX_USER_CODE_LEN: usize = 10;

const STATUS_SHIFT: u8 = 5;
const HOUR_MASK: u8 = 0b0001_1111;

/// Ask the lock for one audit record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordGet {
    /// Slot to read; [`LATEST_RECORD_NUMBER`] asks for the newest entry
    pub record_number: u8,
}

impl RecordGet {
    /// Query for a specific slot
    pub fn new(record_number: u8) -> Self {
        Self { record_number }
    }

    /// Query for the most recent entry
    pub fn latest() -> Self {
        Self { record_number: LATEST_RECORD_NUMBER }
    }

    /// Record queries are built locally and never parsed from the wire.
    ///
    /// Always returns [`ProtocolError::NotImplemented`].
    pub fn decode(_bytes: &[u8]) -> Result<Self> {
        Err(ProtocolError::NotImplemented("RecordGet"))
    }

    /// Encode to the single-byte payload
    pub fn encode(&self) -> Bytes {
        Bytes::copy_from_slice(&[self.record_number])
    }

    pub(crate) fn log_message(&self) -> LogMessage {
        let mut message = LogMessage::default();
        message.push("record number", self.record_number.to_string());
        message
    }
}

/// Slot status carried in the top 3 bits of byte 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Slot holds no record
    Empty,
    /// Slot holds a record
    Occupied,
    /// Any other non-zero status; treated as holding a record
    Reserved(u8),
}

impl RecordStatus {
    /// Parse the 3 status bits
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Self::Empty,
            1 => Self::Occupied,
            other => Self::Reserved(other),
        }
    }

    /// Wire value of the 3 status bits
    pub fn to_bits(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Occupied => 1,
            Self::Reserved(bits) => bits & 0b111,
        }
    }

    /// True when a record body follows
    pub fn has_record(self) -> bool {
        self != Self::Empty
    }
}

/// User code attached to an audit record
///
/// Printable-ASCII codes decode as text; anything else is kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserCode {
    /// Printable ASCII code
    Text(String),
    /// Code bytes that are not printable ASCII
    Raw(Vec<u8>),
}

impl UserCode {
    /// Classify raw code bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) if text.bytes().all(|b| (0x20..=0x7E).contains(&b)) => {
                Self::Text(text.to_owned())
            },
            _ => Self::Raw(bytes.to_vec()),
        }
    }

    /// Wire bytes of the code
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Raw(bytes) => bytes,
        }
    }

    /// Code length in bytes
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// True for a zero-length code
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Masked form for log output (`*` per character)
    pub fn masked(&self) -> String {
        if self.is_empty() { "(empty)".to_owned() } else { "*".repeat(self.len()) }
    }
}

/// Decoded audit log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorLockLoggingRecord {
    /// Raw event code
    pub event_type: u8,
    /// Label from the event catalog, never empty
    pub label: String,
    /// Local wall-clock time reported by the lock
    pub timestamp: NaiveDateTime,
    /// User slot that caused the event, 0 for none
    pub user_id: u8,
    /// Code entered for the event
    pub user_code: UserCode,
}

impl DoorLockLoggingRecord {
    /// Build a record, deriving the label from the event code
    pub fn new(event_type: u8, timestamp: NaiveDateTime, user_id: u8, user_code: UserCode) -> Self {
        Self { event_type, label: label_for(event_type).into_owned(), timestamp, user_id, user_code }
    }

    /// Timestamp as ISO-8601 without offset
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Fixed prefix of a RecordReport payload
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
struct RecordReportPrefix {
    record_number: u8,
    year: U16,
    month: u8,
    day: u8,
    status_hour: u8,
    minute: u8,
    second: u8,
    event_type: u8,
    user_id: u8,
    user_code_len: u8,
}

impl RecordReportPrefix {
    const SIZE: usize = size_of::<Self>();

    fn status(&self) -> RecordStatus {
        RecordStatus::from_bits(self.status_hour >> STATUS_SHIFT)
    }

    fn date_fields(&self) -> DateFields {
        DateFields {
            year: self.year.get(),
            month: self.month,
            day: self.day,
            hour: self.status_hour & HOUR_MASK,
            minute: self.minute,
            second: self.second,
        }
    }
}

/// One audit record returned by the lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordReport {
    /// Slot the record came from
    pub record_number: u8,
    /// Status bits as reported, reserved values included
    pub status: RecordStatus,
    /// Record body, absent when the slot is empty
    pub record: Option<DoorLockLoggingRecord>,
}

impl RecordReport {
    /// Minimum payload length
    pub const MIN_SIZE: usize = RecordReportPrefix::SIZE;

    /// Report for an empty slot
    pub fn empty(record_number: u8) -> Self {
        Self { record_number, status: RecordStatus::Empty, record: None }
    }

    /// Report for an occupied slot
    pub fn occupied(record_number: u8, record: DoorLockLoggingRecord) -> Self {
        Self { record_number, status: RecordStatus::Occupied, record: Some(record) }
    }

    /// Status bits of the slot
    pub fn status(&self) -> RecordStatus {
        self.status
    }

    /// Decode from payload bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::MIN_SIZE {
            return Err(ProtocolError::MalformedFrame {
                expected: Self::MIN_SIZE,
                actual: bytes.len(),
            });
        }

        let (prefix, rest) = RecordReportPrefix::read_from_prefix(bytes).map_err(|_| {
            ProtocolError::MalformedFrame { expected: Self::MIN_SIZE, actual: bytes.len() }
        })?;

        let status = prefix.status();
        if !status.has_record() {
            return Ok(Self::empty(prefix.record_number));
        }

        let code_len = usize::from(prefix.user_code_len);
        if code_len > MAX_USER_CODE_LEN {
            return Err(ProtocolError::UserCodeTooLong { len: code_len, max: MAX_USER_CODE_LEN });
        }
        let code_bytes = rest.get(..code_len).ok_or(ProtocolError::MalformedFrame {
            expected: Self::MIN_SIZE + code_len,
            actual: bytes.len(),
        })?;

        let record = DoorLockLoggingRecord::new(
            prefix.event_type,
            prefix.date_fields().compose(),
            prefix.user_id,
            UserCode::from_bytes(code_bytes),
        );

        Ok(Self { record_number: prefix.record_number, status, record: Some(record) })
    }

    /// Encode to payload bytes.
    ///
    /// An empty slot encodes as the record number followed by 10 zero bytes.
    /// An occupied slot keeps its status bits; a body paired with `Empty`
    /// status is sent as `Occupied`.
    pub fn encode(&self) -> Result<Bytes> {
        let Some(record) = &self.record else {
            let mut buf = BytesMut::zeroed(Self::MIN_SIZE);
            buf[0] = self.record_number;
            return Ok(buf.freeze());
        };

        let code = record.user_code.as_bytes();
        if code.len() > MAX_USER_CODE_LEN {
            return Err(ProtocolError::UserCodeTooLong {
                len: code.len(),
                max: MAX_USER_CODE_LEN,
            });
        }

        let status = if self.status.has_record() { self.status } else { RecordStatus::Occupied };
        let date = DateFields::from_timestamp(&record.timestamp)?;
        let prefix = RecordReportPrefix {
            record_number: self.record_number,
            year: U16::new(date.year),
            month: date.month,
            day: date.day,
            status_hour: (status.to_bits() << STATUS_SHIFT) | date.hour,
            minute: date.minute,
            second: date.second,
            event_type: record.event_type,
            user_id: record.user_id,
            user_code_len: code.len() as u8,
        };

        let mut buf = BytesMut::with_capacity(Self::MIN_SIZE + code.len());
        buf.put_slice(prefix.as_bytes());
        buf.put_slice(code);
        Ok(buf.freeze())
    }

    pub(crate) fn log_message(&self) -> LogMessage {
        let mut message = LogMessage::default();
        let Some(record) = &self.record else {
            message.push("record #", format!("{} (empty)", self.record_number));
            return message;
        };

        message.push("record #", self.record_number.to_string());
        message.push("event type", record.label.clone());
        message.push("timestamp", record.timestamp_iso());
        if record.user_id != 0 {
            message.push("user ID", record.user_id.to_string());
        }
        if !record.user_code.is_empty() {
            message.push("user code", record.user_code.masked());
        }
        message
    }
}
