//! Payload types for the four Door Lock Logging commands.
//!
//! [`Payload`] is the tagged union over all frame shapes. Decoding goes through
//! [`DECODERS`], a fixed table from command to decode function.

pub mod record;
pub mod records_supported;
mod timestamp;

use std::fmt;

use bytes::Bytes;
pub use record::{
    DoorLockLoggingRecord, LATEST_RECORD_NUMBER, MAX_USER_CODE_LEN, RecordGet, RecordReport,
    RecordStatus, UserCode,
};
pub use records_supported::{RecordsSupportedGet, RecordsSupportedReport};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{ProtocolError, Result},
    frame::Frame,
    opcodes::Command,
};

/// Decode function for one command's payload
type Decoder = fn(&[u8]) -> Result<Payload>;

/// Command -> decoder lookup table
const DECODERS: [(Command, Decoder); 4] = [
    (Command::RecordsSupportedGet, decode_records_supported_get),
    (Command::RecordsSupportedReport, decode_records_supported_report),
    (Command::RecordGet, decode_record_get),
    (Command::RecordReport, decode_record_report),
];

fn decode_records_supported_get(bytes: &[u8]) -> Result<Payload> {
    RecordsSupportedGet::decode(bytes).map(Payload::RecordsSupportedGet)
}

fn decode_records_supported_report(bytes: &[u8]) -> Result<Payload> {
    RecordsSupportedReport::decode(bytes).map(Payload::RecordsSupportedReport)
}

fn decode_record_get(bytes: &[u8]) -> Result<Payload> {
    RecordGet::decode(bytes).map(Payload::RecordGet)
}

fn decode_record_report(bytes: &[u8]) -> Result<Payload> {
    RecordReport::decode(bytes).map(Payload::RecordReport)
}

/// Decoded Door Lock Logging message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Capability query
    RecordsSupportedGet(RecordsSupportedGet),
    /// Capability answer
    RecordsSupportedReport(RecordsSupportedReport),
    /// Record query
    RecordGet(RecordGet),
    /// Record answer
    RecordReport(RecordReport),
}

impl Payload {
    /// Command identifier for this payload
    pub fn command(&self) -> Command {
        match self {
            Self::RecordsSupportedGet(_) => Command::RecordsSupportedGet,
            Self::RecordsSupportedReport(_) => Command::RecordsSupportedReport,
            Self::RecordGet(_) => Command::RecordGet,
            Self::RecordReport(_) => Command::RecordReport,
        }
    }

    /// Decode a payload body for the given command
    pub fn decode(command: Command, bytes: &[u8]) -> Result<Self> {
        let decoder = DECODERS
            .iter()
            .find_map(|(cmd, decoder)| (*cmd == command).then_some(*decoder))
            .ok_or(ProtocolError::UnknownCommand(command.to_u8()))?;
        decoder(bytes)
    }

    /// Decode the payload carried by a frame
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        Self::decode(frame.command(), frame.payload())
    }

    /// Encode the payload body (without the frame envelope)
    pub fn encode(&self) -> Result<Bytes> {
        match self {
            Self::RecordsSupportedGet(get) => Ok(get.encode()),
            Self::RecordsSupportedReport(report) => Ok(report.encode()),
            Self::RecordGet(get) => Ok(get.encode()),
            Self::RecordReport(report) => report.encode(),
        }
    }

    /// Wrap the encoded payload in a frame
    pub fn into_frame(self) -> Result<Frame> {
        let payload = self.encode()?;
        Ok(Frame::new(self.command(), payload))
    }

    /// Fields shown when this payload is logged
    pub fn log_message(&self) -> LogMessage {
        match self {
            Self::RecordsSupportedGet(_) => LogMessage::default(),
            Self::RecordsSupportedReport(report) => report.log_message(),
            Self::RecordGet(get) => get.log_message(),
            Self::RecordReport(report) => report.log_message(),
        }
    }
}

/// Ordered key/value pairs describing a payload in log output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogMessage(Vec<(&'static str, String)>);

impl LogMessage {
    /// Append a field
    pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
        self.0.push((key, value.into()));
    }

    /// Value of a field, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    /// Iterate over fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn every_command_has_a_decoder() {
        for (cmd, _) in DECODERS {
            assert!(Command::from_u8(cmd.to_u8()).is_some());
        }
        assert_eq!(DECODERS.len(), 4);
    }

    #[test]
    fn decode_dispatches_on_command() {
        let payload = Payload::decode(Command::RecordsSupportedReport, &[5]).unwrap();
        assert_eq!(payload, Payload::RecordsSupportedReport(RecordsSupportedReport {
            records_count: 5
        }));

        let payload =
            Payload::decode(Command::RecordReport, &hex!("02 0000 00 00 00 00 00 00 00 00")).unwrap();
        assert!(matches!(
            payload,
            Payload::RecordReport(RecordReport { record_number: 2, record: None, .. })
        ));
    }

    #[test]
    fn record_get_is_outbound_only() {
        let err = Payload::decode(Command::RecordGet, &[1]).unwrap_err();
        assert_eq!(err, ProtocolError::NotImplemented("RecordGet"));
    }

    #[test]
    fn log_message_display() {
        let message = Payload::RecordsSupportedReport(RecordsSupportedReport { records_count: 5 })
            .log_message();
        insta::assert_snapshot!(message.to_string(), @"supported no. of records: 5");
    }
}
