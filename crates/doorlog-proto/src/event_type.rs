//! Audit event types and their human-readable labels.
//!
//! The catalog is total over `u8`: codes without an entry get a synthesized
//! `"Unknown 0xNN"` label instead of an error.

use std::borrow::Cow;

use serde_repr::{Deserialize_repr, Serialize_repr};

/// Event recorded in an audit log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum EventType {
    LockCode = 1,
    UnlockCode = 2,
    LockButton = 3,
    UnlockButton = 4,
    LockCodeOutOfSchedule = 5,
    UnlockCodeOutOfSchedule = 6,
    IllegalCode = 7,
    LockManual = 8,
    UnlockManual = 9,
    LockAuto = 10,
    UnlockAuto = 11,
    LockRemoteCode = 12,
    UnlockRemoteCode = 13,
    LockRemote = 14,
    UnlockRemote = 15,
    LockRemoteCodeOutOfSchedule = 16,
    UnlockRemoteCodeOutOfSchedule = 17,
    RemoteIllegalCode = 18,
    LockManual2 = 19,
    UnlockManual2 = 20,
    LockSecured = 21,
    LockUnsecured = 22,
    UserCodeAdded = 23,
    UserCodeDeleted = 24,
    AllUserCodesDeleted = 25,
    AdminCodeChanged = 26,
    UserCodeChanged = 27,
    LockReset = 28,
    ConfigurationChanged = 29,
    LowBattery = 30,
    NewBattery = 31,
    Unknown = 32,
}

/// Catalog indexed by `code - 1`
const CATALOG: [(EventType, &str); 32] = [
    (EventType::LockCode, "Locked via Access Code"),
    (EventType::UnlockCode, "Unlocked via Access Code"),
    (EventType::LockButton, "Locked via Lock Button"),
    (EventType::UnlockButton, "Unlocked via Unlock Button"),
    (EventType::LockCodeOutOfSchedule, "Out of Schedule Lock Attempt via Access Code"),
    (EventType::UnlockCodeOutOfSchedule, "Out of Schedule Unlock Attempt via Access Code"),
    (EventType::IllegalCode, "Illegal Access Code Entered"),
    (EventType::LockManual, "Manually Locked"),
    (EventType::UnlockManual, "Manually Unlocked"),
    (EventType::LockAuto, "Auto Locked"),
    (EventType::UnlockAuto, "Auto Unlocked"),
    (EventType::LockRemoteCode, "Locked via Remote Access Code"),
    (EventType::UnlockRemoteCode, "Unlocked via Remote Access Code"),
    (EventType::LockRemote, "Locked via Remote"),
    (EventType::UnlockRemote, "Unlocked via Remote"),
    (EventType::LockRemoteCodeOutOfSchedule, "Out of Schedule Lock Attempt via Remote Access Code"),
    (
        EventType::UnlockRemoteCodeOutOfSchedule,
        "Out of Schedule Unlock Attempt via Remote Access Code",
    ),
    (EventType::RemoteIllegalCode, "Illegal Remote Access Code"),
    (EventType::LockManual2, "Manually Locked (2)"),
    (EventType::UnlockManual2, "Manually Unlocked (2)"),
    (EventType::LockSecured, "Lock Secured"),
    (EventType::LockUnsecured, "Lock Unsecured"),
    (EventType::UserCodeAdded, "User Code Added"),
    (EventType::UserCodeDeleted, "User Code Deleted"),
    (EventType::AllUserCodesDeleted, "All User Codes Deleted"),
    (EventType::AdminCodeChanged, "Admin Code Changed"),
    (EventType::UserCodeChanged, "User Code Changed"),
    (EventType::LockReset, "Lock Reset"),
    (EventType::ConfigurationChanged, "Configuration Changed"),
    (EventType::LowBattery, "Low Battery"),
    (EventType::NewBattery, "New Battery Installed"),
    (EventType::Unknown, "Unknown"),
];

impl EventType {
    /// Convert event type to its wire byte
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Look up an event type by wire byte
    pub fn from_u8(code: u8) -> Option<Self> {
        let index = usize::from(code).checked_sub(1)?;
        CATALOG.get(index).map(|(event, _)| *event)
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        CATALOG[usize::from(self.to_u8()) - 1].1
    }
}

/// Label for any event code.
///
/// Unmapped codes produce `"Unknown 0xNN"` so the result is never empty.
pub fn label_for(code: u8) -> Cow<'static, str> {
    match EventType::from_u8(code) {
        Some(event) => Cow::Borrowed(event.label()),
        None => Cow::Owned(format!("Unknown 0x{code:02X}")),
    }
}
