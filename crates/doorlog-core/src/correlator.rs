//! Reply correlation.
//!
//! The transport holds one [`PendingRequest`] per outstanding query and asks it
//! whether each inbound frame is the answer. A record query for
//! [`LATEST_RECORD_NUMBER`] accepts any record report, since the lock picks
//! the slot; any other query only accepts a report for the same slot.
//!
//! This only validates. Routing replies between concurrent queries is left to
//! the transport.

use doorlog_proto::{Command, Frame, LATEST_RECORD_NUMBER, Payload, Result};

use crate::endpoint::Endpoint;

/// Whether a report for `received` answers a query for `sent`
pub fn matches(sent: u8, received: u8) -> bool {
    sent == LATEST_RECORD_NUMBER || sent == received
}

/// An encoded request waiting for its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    endpoint: Endpoint,
    payload: Payload,
    frame: Frame,
}

impl PendingRequest {
    /// Encode `payload` for `endpoint`
    pub fn new(endpoint: Endpoint, payload: Payload) -> Result<Self> {
        let frame = payload.clone().into_frame()?;
        Ok(Self { endpoint, payload, frame })
    }

    /// Target endpoint
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Request as sent
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Encoded frame to put on the wire
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Reply command this request waits for, `None` if it expects no reply
    pub fn expected_response(&self) -> Option<Command> {
        self.payload.command().expected_response()
    }

    /// Whether `reply` answers this request
    pub fn accepts(&self, reply: &Frame) -> bool {
        if self.expected_response() != Some(reply.command()) {
            return false;
        }

        match &self.payload {
            // Record number is the first payload byte of a RecordReport
            Payload::RecordGet(get) => {
                reply.payload().first().is_some_and(|&received| matches(get.record_number, received))
            },
            _ => true,
        }
    }
}
