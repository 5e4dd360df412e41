//! Error types for the core crate.

use doorlog_proto::{Command, ProtocolError};
use thiserror::Error;

use crate::{endpoint::NodeId, interview::InterviewState};

/// Errors from the record API and the interview driver
#[derive(Debug, Error)]
pub enum ApiError {
    /// Endpoint does not advertise the command
    #[error("node {node_id} does not support {}", .command.name())]
    UnsupportedOperation {
        /// Command the caller tried to send
        command: Command,
        /// Target node
        node_id: NodeId,
    },

    /// Reply did not match the command the request expects
    #[error("unexpected response {} to {}", .received.name(), .sent.name())]
    UnexpectedResponse {
        /// Command that was sent
        sent: Command,
        /// Command that came back
        received: Command,
    },

    /// Encoding or decoding failed
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Transport failed (timeouts are not errors)
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Value store failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Interview state machine rejected a transition
    #[error(transparent)]
    Interview(#[from] InterviewError),
}

/// Transport failures other than a missing reply
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Session is closed
    #[error("transport closed")]
    Closed,

    /// Lower-level send failure
    #[error("send failed: {0}")]
    Send(String),
}

/// Value store failures
#[derive(Debug, Error)]
pub enum StorageError {
    /// Snapshot could not be encoded
    #[error("failed to encode value snapshot: {0}")]
    Encode(String),

    /// Snapshot could not be decoded
    #[error("failed to decode value snapshot: {0}")]
    Decode(String),

    /// Lock was poisoned by a panicking writer
    #[error("value store lock poisoned")]
    Poisoned,
}

/// Interview state machine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterviewError {
    /// Operation is not valid in the current state
    #[error("cannot {operation} in state {state:?}")]
    InvalidState {
        /// State when the operation was attempted
        state: InterviewState,
        /// Attempted operation
        operation: &'static str,
    },
}
