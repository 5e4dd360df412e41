//! Interview state machine.
//!
//! Discovers how many audit records a lock keeps. The machine performs no
//! I/O: every transition returns [`InterviewAction`]s and the driver
//! ([`crate::api::run_interview`]) executes them.
//!
//! # State Machine
//!
//! ```text
//! ┌────────────┐  start   ┌───────────────┐ Known(n>0) ┌──────────┐
//! │ NotStarted │─────────>│ QueryingCount │───────────>│ Complete │
//! └────────────┘          └───────────────┘            └──────────┘
//!                                 │
//!                                 │ Unknown (timeout) or Known(0)
//!                                 ↓
//!                            ┌─────────┐
//!                            │ Aborted │
//!                            └─────────┘
//! ```
//!
//! `Complete` and `Aborted` are terminal. Running again means creating a new
//! [`Interview`]. An aborted interview is not an error: the lock is skipped
//! for this capability only.

use std::fmt;

use crate::{
    error::InterviewError,
    maybe::MaybeKnown,
    storage::{RECORDS_COUNT, Value},
};

/// Name used in log messages
const COMMAND_CLASS_NAME: &str = "Door Lock Logging";

/// Interview progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterviewState {
    /// Nothing sent yet
    NotStarted,
    /// Records-supported query outstanding
    QueryingCount,
    /// Count received and stored
    Complete,
    /// Lock did not answer
    Aborted,
}

impl InterviewState {
    /// True for `Complete` and `Aborted`
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Aborted)
    }
}

/// Whether the machine runs a full interview or only refreshes values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Interview,
    Refresh,
}

/// Direction of the traffic a log entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// No traffic
    None,
    /// Controller -> lock
    Outbound,
    /// Lock -> controller
    Inbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Outbound => "outbound",
            Self::Inbound => "inbound",
        })
    }
}

/// Log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Normal progress
    Info,
    /// Degraded outcome
    Warn,
}

/// Log line produced by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Text
    pub message: String,
    /// Traffic direction
    pub direction: Direction,
    /// Severity
    pub level: LogLevel,
}

impl LogEntry {
    fn info(message: impl Into<String>, direction: Direction) -> Self {
        Self { message: message.into(), direction, level: LogLevel::Info }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self { message: message.into(), direction: Direction::None, level: LogLevel::Warn }
    }
}

/// Actions returned by the interview state machine.
///
/// The driver executes these in order:
/// - `Log`: emit the entry for this endpoint
/// - `QueryRecordsCount`: send RecordsSupportedGet and feed the outcome to
///   [`Interview::handle_records_count`]
/// - `PersistValue`: write the value to the value store
/// - `MarkComplete`: record that the interview finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterviewAction {
    /// Emit a log entry
    Log(LogEntry),
    /// Ask the lock for its record count
    QueryRecordsCount,
    /// Store a discovered value
    PersistValue {
        /// Property name
        property: &'static str,
        /// Value to store
        value: Value,
    },
    /// Interview finished
    MarkComplete,
}

/// Interview state machine for one endpoint
#[derive(Debug, Clone)]
pub struct Interview {
    state: InterviewState,
    mode: Mode,
}

impl Default for Interview {
    fn default() -> Self {
        Self::new()
    }
}

impl Interview {
    /// Full interview: logs the start and marks completion
    pub fn new() -> Self {
        Self { state: InterviewState::NotStarted, mode: Mode::Interview }
    }

    /// Value refresh: same query, no completion marker
    pub fn refresh() -> Self {
        Self { state: InterviewState::NotStarted, mode: Mode::Refresh }
    }

    /// Current state
    pub fn state(&self) -> InterviewState {
        self.state
    }

    /// Begin the interview
    ///
    /// # Errors
    /// Returns `InvalidState` if already started
    pub fn start(&mut self) -> Result<Vec<InterviewAction>, InterviewError> {
        if self.state != InterviewState::NotStarted {
            return Err(InterviewError::InvalidState { state: self.state, operation: "start" });
        }

        let mut actions = Vec::with_capacity(3);
        if self.mode == Mode::Interview {
            actions.push(InterviewAction::Log(LogEntry::info(
                format!("Interviewing {COMMAND_CLASS_NAME}..."),
                Direction::None,
            )));
        }
        actions.push(InterviewAction::Log(LogEntry::info(
            "querying supported number of records...",
            Direction::Outbound,
        )));
        actions.push(InterviewAction::QueryRecordsCount);

        self.state = InterviewState::QueryingCount;
        Ok(actions)
    }

    /// Feed the outcome of the records-supported query
    ///
    /// # Errors
    /// Returns `InvalidState` unless a query is outstanding
    pub fn handle_records_count(
        &mut self,
        records_count: MaybeKnown<u8>,
    ) -> Result<Vec<InterviewAction>, InterviewError> {
        if self.state != InterviewState::QueryingCount {
            return Err(InterviewError::InvalidState {
                state: self.state,
                operation: "handle_records_count",
            });
        }

        // A lock that keeps no records has nothing to retrieve
        let Some(count) = records_count.known().filter(|&count| count > 0) else {
            self.state = InterviewState::Aborted;
            return Ok(vec![InterviewAction::Log(LogEntry::warn(format!(
                "{COMMAND_CLASS_NAME} records count query timed out, skipping interview..."
            )))]);
        };

        let mut actions = vec![
            InterviewAction::Log(LogEntry::info(records_count_message(count), Direction::Inbound)),
            InterviewAction::PersistValue { property: RECORDS_COUNT, value: Value::Number(count.into()) },
        ];
        if self.mode == Mode::Interview {
            actions.push(InterviewAction::MarkComplete);
        }

        self.state = InterviewState::Complete;
        Ok(actions)
    }
}

/// "supports N record(s)"
pub fn records_count_message(count: u8) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("supports {count} record{plural}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interview_lifecycle() {
        let mut interview = Interview::new();
        assert_eq!(interview.state(), InterviewState::NotStarted);

        let actions = interview.start().unwrap();
        assert_eq!(interview.state(), InterviewState::QueryingCount);
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[2], InterviewAction::QueryRecordsCount);

        let actions = interview.handle_records_count(MaybeKnown::Known(5)).unwrap();
        assert_eq!(interview.state(), InterviewState::Complete);
        assert_eq!(actions, vec![
            InterviewAction::Log(LogEntry::info("supports 5 records", Direction::Inbound)),
            InterviewAction::PersistValue { property: RECORDS_COUNT, value: Value::Number(5) },
            InterviewAction::MarkComplete,
        ]);
        assert!(interview.state().is_terminal());
    }

    #[test]
    fn timeout_aborts_without_persisting() {
        let mut interview = Interview::new();
        interview.start().unwrap();

        let actions = interview.handle_records_count(MaybeKnown::Unknown).unwrap();
        assert_eq!(interview.state(), InterviewState::Aborted);
        assert_eq!(actions.len(), 1);
        let InterviewAction::Log(entry) = &actions[0] else {
            panic!("expected a log entry, got {:?}", actions[0]);
        };
        assert_eq!(entry.level, LogLevel::Warn);
        insta::assert_snapshot!(
            entry.message,
            @"Door Lock Logging records count query timed out, skipping interview..."
        );
    }

    #[test]
    fn zero_count_aborts_like_a_timeout() {
        for mut machine in [Interview::new(), Interview::refresh()] {
            machine.start().unwrap();

            let actions = machine.handle_records_count(MaybeKnown::Known(0)).unwrap();
            assert_eq!(machine.state(), InterviewState::Aborted);
            let [InterviewAction::Log(entry)] = actions.as_slice() else {
                panic!("expected only a warning, got {actions:?}");
            };
            assert_eq!(entry.level, LogLevel::Warn);
            assert!(entry.message.contains("timed out, skipping interview"));
        }
    }

    #[test]
    fn refresh_skips_interview_markers() {
        let mut refresh = Interview::refresh();
        let actions = refresh.start().unwrap();
        assert_eq!(actions.len(), 2);

        let actions = refresh.handle_records_count(MaybeKnown::Known(1)).unwrap();
        assert!(!actions.contains(&InterviewAction::MarkComplete));
        assert_eq!(refresh.state(), InterviewState::Complete);
    }

    #[test]
    fn invalid_state_transitions() {
        let mut interview = Interview::new();

        // No query outstanding yet
        let result = interview.handle_records_count(MaybeKnown::Known(1));
        assert!(matches!(result, Err(InterviewError::InvalidState { .. })));

        // Can't start twice
        interview.start().unwrap();
        let result = interview.start();
        assert!(matches!(result, Err(InterviewError::InvalidState { .. })));

        // Terminal states accept nothing
        interview.handle_records_count(MaybeKnown::Unknown).unwrap();
        let result = interview.handle_records_count(MaybeKnown::Known(1));
        assert!(matches!(result, Err(InterviewError::InvalidState { .. })));
    }

    #[test]
    fn pluralization() {
        assert_eq!(records_count_message(0), "supports 0 records");
        assert_eq!(records_count_message(1), "supports 1 record");
        assert_eq!(records_count_message(5), "supports 5 records");
    }
}
