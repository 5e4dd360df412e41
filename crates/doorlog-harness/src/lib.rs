//! Deterministic simulation harness for Door Lock Logging tests.
//!
//! [`SimDevice`] plays the lock: it keeps an audit log and answers queries.
//! [`SimTransport`] implements [`doorlog_core::Transport`] over in-process
//! channels to a spawned device task, applying the same reply correlation and
//! timeout rules a real session layer must.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod sim_device;
pub mod sim_transport;

pub use sim_device::SimDevice;
pub use sim_transport::{SentCommand, SimTransport};
