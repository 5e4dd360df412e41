//! Records-supported capability query and report.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::LogMessage;
use crate::errors::{ProtocolError, Result};

/// Ask the lock how many audit records it keeps. Empty payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsSupportedGet;

impl RecordsSupportedGet {
    /// Decode (trailing bytes are ignored)
    pub fn decode(_bytes: &[u8]) -> Result<Self> {
        Ok(Self)
    }

    /// Encode to an empty payload
    pub fn encode(&self) -> Bytes {
        Bytes::new()
    }
}

/// Number of audit record slots the lock holds
///
/// A count of 0 means the lock keeps no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsSupportedReport {
    /// Total audit slots
    pub records_count: u8,
}

impl RecordsSupportedReport {
    /// Minimum payload length
    pub const MIN_SIZE: usize = 1;

    /// Decode from payload bytes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let [records_count, ..] = *bytes else {
            return Err(ProtocolError::MalformedFrame {
                expected: Self::MIN_SIZE,
                actual: bytes.len(),
            });
        };
        Ok(Self { records_count })
    }

    /// Encode to payload bytes
    pub fn encode(&self) -> Bytes {
        Bytes::copy_from_slice(&[self.records_count])
    }

    pub(crate) fn log_message(&self) -> LogMessage {
        let mut message = LogMessage::default();
        message.push("supported no. of records", self.records_count.to_string());
        message
    }
}
