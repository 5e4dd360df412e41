//! Command identifiers for the Door Lock Logging command class.

use serde_repr::{Deserialize_repr, Serialize_repr};

/// Command class identifier carried in the first byte of every frame
pub const COMMAND_CLASS_ID: u8 = 0x4C;

/// Commands of the Door Lock Logging command class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Command {
    /// Ask how many audit records the lock keeps
    RecordsSupportedGet = 0x01,
    /// Number of audit records the lock keeps
    RecordsSupportedReport = 0x02,
    /// Ask for one audit record (0 = latest)
    RecordGet = 0x03,
    /// One audit record
    RecordReport = 0x04,
}

impl Command {
    /// Convert command to its wire byte
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Parse command from its wire byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::RecordsSupportedGet),
            0x02 => Some(Self::RecordsSupportedReport),
            0x03 => Some(Self::RecordGet),
            0x04 => Some(Self::RecordReport),
            _ => None,
        }
    }

    /// Command the device answers this one with, if it expects an answer
    pub fn expected_response(self) -> Option<Self> {
        match self {
            Self::RecordsSupportedGet => Some(Self::RecordsSupportedReport),
            Self::RecordGet => Some(Self::RecordReport),
            Self::RecordsSupportedReport | Self::RecordReport => None,
        }
    }

    /// Name used in log output
    pub fn name(self) -> &'static str {
        match self {
            Self::RecordsSupportedGet => "RecordsSupportedGet",
            Self::RecordsSupportedReport => "RecordsSupportedReport",
            Self::RecordGet => "RecordGet",
            Self::RecordReport => "RecordReport",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_byte_round_trip() {
        for cmd in [
            Command::RecordsSupportedGet,
            Command::RecordsSupportedReport,
            Command::RecordGet,
            Command::RecordReport,
        ] {
            assert_eq!(Command::from_u8(cmd.to_u8()), Some(cmd));
        }
        assert_eq!(Command::from_u8(0x00), None);
        assert_eq!(Command::from_u8(0x05), None);
    }

    #[test]
    fn only_gets_expect_responses() {
        assert_eq!(
            Command::RecordsSupportedGet.expected_response(),
            Some(Command::RecordsSupportedReport)
        );
        assert_eq!(Command::RecordGet.expected_response(), Some(Command::RecordReport));
        assert_eq!(Command::RecordReport.expected_response(), None);
    }
}
