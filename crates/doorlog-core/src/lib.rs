//! Door Lock Logging core logic
//!
//! Everything between the wire codec and a real transport: deciding which
//! reply answers which request, the capability interview, and the record API
//! callers use. No I/O happens here. The transport and the value store are
//! traits supplied by the caller.
//!
//! # Architecture
//!
//! The interview is a deterministic state machine. Its transitions return
//! declarative [`interview::InterviewAction`]s (log this, query that, persist
//! this value) and the async driver in [`api`] executes them against a
//! [`Transport`] and a [`ValueStore`]. Tests drive the state machine directly
//! without any runtime.
//!
//! # Components
//!
//! - [`correlator`]: reply matching for outstanding requests
//! - [`interview`]: interview/refresh state machine
//! - [`api`]: `get_records_count` / `get_record` façade and interview driver
//! - [`transport`]: transport abstraction and reply timeout helper
//! - [`storage`]: value store contract and in-memory implementation
//! - [`options`]: per-command options (timeout, priority)
//! - [`error`]: error types

pub mod api;
pub mod correlator;
pub mod endpoint;
pub mod error;
pub mod interview;
pub mod maybe;
pub mod options;
pub mod storage;
pub mod transport;

pub use api::{DoorLockLoggingApi, refresh_values, run_interview};
pub use correlator::{PendingRequest, matches};
pub use endpoint::{Endpoint, NodeId};
pub use error::{ApiError, InterviewError, StorageError, TransportError};
pub use interview::{Direction, Interview, InterviewAction, InterviewState, LogEntry, LogLevel};
pub use maybe::MaybeKnown;
pub use options::{CommandOptions, Priority};
pub use storage::{INTERVIEW_COMPLETE, MemoryStore, RECORDS_COUNT, Value, ValueId, ValueStore};
pub use transport::Transport;
