//! Frame envelope.
//!
//! ```text
//! ┌──────────┬─────────┬──────────────────┐
//! │ CC 0x4C  │ command │ payload (0..N)   │
//! └──────────┴─────────┴──────────────────┘
//! ```

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    errors::{ProtocolError, Result},
    opcodes::{COMMAND_CLASS_ID, Command},
    payloads::Payload,
};

/// A Door Lock Logging frame: command identifier plus raw payload
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    command: Command,
    payload: Bytes,
}

impl Frame {
    /// Envelope size (command class + command)
    pub const HEADER_SIZE: usize = 2;

    /// Create a frame from a command and an encoded payload
    pub fn new(command: Command, payload: impl Into<Bytes>) -> Self {
        Self { command, payload: payload.into() }
    }

    /// Command carried by this frame
    pub fn command(&self) -> Command {
        self.command
    }

    /// Raw payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Total encoded size
    pub fn encoded_len(&self) -> usize {
        Self::HEADER_SIZE + self.payload.len()
    }

    /// Write the frame to `dst`
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u8(COMMAND_CLASS_ID);
        dst.put_u8(self.command.to_u8());
        dst.put_slice(&self.payload);
    }

    /// Encode into a fresh buffer
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Parse the envelope. The payload is not decoded.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let [cc, command, payload @ ..] = bytes else {
            return Err(ProtocolError::MalformedFrame {
                expected: Self::HEADER_SIZE,
                actual: bytes.len(),
            });
        };

        if *cc != COMMAND_CLASS_ID {
            return Err(ProtocolError::WrongCommandClass(*cc));
        }
        let command = Command::from_u8(*command).ok_or(ProtocolError::UnknownCommand(*command))?;

        Ok(Self { command, payload: Bytes::copy_from_slice(payload) })
    }

    /// Decode the payload
    pub fn payload_decoded(&self) -> Result<Payload> {
        Payload::from_frame(self)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("command", &self.command.name())
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::payloads::{RecordGet, RecordsSupportedReport};

    #[test]
    fn record_get_frame_bytes() {
        let frame = Payload::RecordGet(RecordGet::new(7)).into_frame().unwrap();
        insta::assert_snapshot!(hex::encode(frame.to_bytes()), @"4c0307");
    }

    #[test]
    fn decode_envelope_and_payload() {
        let frame = Frame::decode(&hex!("4C 02 05")).unwrap();
        assert_eq!(frame.command(), Command::RecordsSupportedReport);
        assert_eq!(
            frame.payload_decoded().unwrap(),
            Payload::RecordsSupportedReport(RecordsSupportedReport { records_count: 5 })
        );
    }

    #[test]
    fn decode_rejects_short_envelope() {
        assert_eq!(
            Frame::decode(&[0x4C]),
            Err(ProtocolError::MalformedFrame { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn decode_rejects_foreign_command_class() {
        assert_eq!(Frame::decode(&hex!("62 02 05")), Err(ProtocolError::WrongCommandClass(0x62)));
    }

    #[test]
    fn decode_rejects_unknown_command() {
        assert_eq!(Frame::decode(&hex!("4C 09")), Err(ProtocolError::UnknownCommand(0x09)));
    }

    #[test]
    fn record_get_frame_cannot_be_parsed_back() {
        let frame = Frame::decode(&hex!("4C 03 00")).unwrap();
        assert_eq!(frame.payload_decoded(), Err(ProtocolError::NotImplemented("RecordGet")));
    }
}
