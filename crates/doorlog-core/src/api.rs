//! Record API and interview driver.
//!
//! [`DoorLockLoggingApi`] is what callers use: it checks that the endpoint
//! advertises the command class, builds the request, hands it to the
//! [`Transport`] and decodes the correlated reply. A lock that stays silent
//! yields [`MaybeKnown::Unknown`].
//!
//! [`run_interview`] and [`refresh_values`] execute the
//! [`Interview`](crate::interview::Interview) state machine's actions against
//! the API, a [`ValueStore`] and `tracing`.

use std::collections::VecDeque;

use doorlog_proto::{
    Command, DoorLockLoggingRecord, LATEST_RECORD_NUMBER, Payload, RecordGet, RecordsSupportedGet,
};
use tracing::{debug, info, warn};

use crate::{
    correlator::PendingRequest,
    endpoint::Endpoint,
    error::ApiError,
    interview::{Interview, InterviewAction, InterviewState, LogEntry, LogLevel},
    maybe::MaybeKnown,
    options::{CommandOptions, Priority},
    storage::{INTERVIEW_COMPLETE, Value, ValueId, ValueStore},
    transport::Transport,
};

/// Door Lock Logging commands for one endpoint
pub struct DoorLockLoggingApi<'a, T: ?Sized> {
    transport: &'a T,
    endpoint: Endpoint,
    options: CommandOptions,
}

impl<T: ?Sized> Clone for DoorLockLoggingApi<'_, T> {
    fn clone(&self) -> Self {
        Self { transport: self.transport, endpoint: self.endpoint, options: self.options }
    }
}

impl<'a, T: Transport + ?Sized> DoorLockLoggingApi<'a, T> {
    /// API for `endpoint` over `transport` with default options
    pub fn new(transport: &'a T, endpoint: Endpoint) -> Self {
        Self { transport, endpoint, options: CommandOptions::default() }
    }

    /// Use different command options
    #[must_use]
    pub fn with_options(mut self, options: CommandOptions) -> Self {
        self.options = options;
        self
    }

    /// Target endpoint
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Options used for each exchange
    pub fn options(&self) -> &CommandOptions {
        &self.options
    }

    /// Whether the endpoint accepts `command`
    pub fn supports_command(&self, command: Command) -> bool {
        match command {
            Command::RecordsSupportedGet
            | Command::RecordsSupportedReport
            | Command::RecordGet
            | Command::RecordReport => self.endpoint.supports_door_lock_logging,
        }
    }

    fn assert_supports_command(&self, command: Command) -> Result<(), ApiError> {
        if self.supports_command(command) {
            Ok(())
        } else {
            Err(ApiError::UnsupportedOperation { command, node_id: self.endpoint.node_id })
        }
    }

    /// Ask how many audit records the lock keeps
    pub async fn get_records_count(&self) -> Result<MaybeKnown<u8>, ApiError> {
        self.assert_supports_command(Command::RecordsSupportedGet)?;

        let reply = self.send(Payload::RecordsSupportedGet(RecordsSupportedGet)).await?;
        match reply {
            MaybeKnown::Known(Payload::RecordsSupportedReport(report)) => {
                Ok(MaybeKnown::Known(report.records_count))
            },
            MaybeKnown::Known(other) => Err(ApiError::UnexpectedResponse {
                sent: Command::RecordsSupportedGet,
                received: other.command(),
            }),
            MaybeKnown::Unknown => Ok(MaybeKnown::Unknown),
        }
    }

    /// Retrieve one audit record. [`LATEST_RECORD_NUMBER`] asks for the newest.
    ///
    /// `Known(None)` means the slot is empty; `Unknown` means no reply.
    pub async fn get_record(
        &self,
        record_number: u8,
    ) -> Result<MaybeKnown<Option<DoorLockLoggingRecord>>, ApiError> {
        self.assert_supports_command(Command::RecordGet)?;

        let reply = self.send(Payload::RecordGet(RecordGet::new(record_number))).await?;
        match reply {
            MaybeKnown::Known(Payload::RecordReport(report)) => Ok(MaybeKnown::Known(report.record)),
            MaybeKnown::Known(other) => Err(ApiError::UnexpectedResponse {
                sent: Command::RecordGet,
                received: other.command(),
            }),
            MaybeKnown::Unknown => Ok(MaybeKnown::Unknown),
        }
    }

    /// Retrieve the most recent audit record
    pub async fn get_latest_record(
        &self,
    ) -> Result<MaybeKnown<Option<DoorLockLoggingRecord>>, ApiError> {
        self.get_record(LATEST_RECORD_NUMBER).await
    }

    async fn send(&self, payload: Payload) -> Result<MaybeKnown<Payload>, ApiError> {
        let command = payload.command();
        debug!(
            node_id = self.endpoint.node_id,
            endpoint = self.endpoint.index,
            direction = "outbound",
            command = command.name(),
            "{}",
            payload.log_message()
        );

        let request = PendingRequest::new(self.endpoint, payload)?;
        let reply = self.transport.send_command(&request, &self.options).await?;

        let MaybeKnown::Known(frame) = reply else {
            debug!(
                node_id = self.endpoint.node_id,
                endpoint = self.endpoint.index,
                command = command.name(),
                timeout_ms = self.options.timeout.as_millis() as u64,
                "no reply"
            );
            return Ok(MaybeKnown::Unknown);
        };

        let payload = frame.payload_decoded()?;
        debug!(
            node_id = self.endpoint.node_id,
            endpoint = self.endpoint.index,
            direction = "inbound",
            command = payload.command().name(),
            "{}",
            payload.log_message()
        );
        Ok(MaybeKnown::Known(payload))
    }
}

/// Run the Door Lock Logging interview for the API's endpoint.
///
/// Returns the terminal state. A silent lock ends in
/// [`InterviewState::Aborted`] and is not an error.
pub async fn run_interview<T: Transport + ?Sized>(
    api: &DoorLockLoggingApi<'_, T>,
    store: &dyn ValueStore,
) -> Result<InterviewState, ApiError> {
    drive(Interview::new(), api, store).await
}

/// Re-query the record count and store it, without touching interview
/// completion.
pub async fn refresh_values<T: Transport + ?Sized>(
    api: &DoorLockLoggingApi<'_, T>,
    store: &dyn ValueStore,
) -> Result<InterviewState, ApiError> {
    drive(Interview::refresh(), api, store).await
}

async fn drive<T: Transport + ?Sized>(
    mut interview: Interview,
    api: &DoorLockLoggingApi<'_, T>,
    store: &dyn ValueStore,
) -> Result<InterviewState, ApiError> {
    let api = api.clone().with_options(api.options().with_priority(Priority::NodeQuery));
    let endpoint = api.endpoint();

    let mut pending: VecDeque<InterviewAction> = interview.start()?.into();
    while let Some(action) = pending.pop_front() {
        match action {
            InterviewAction::Log(entry) => emit(endpoint, &entry),
            InterviewAction::QueryRecordsCount => {
                let count = api.get_records_count().await?;
                pending.extend(interview.handle_records_count(count)?);
            },
            InterviewAction::PersistValue { property, value } => {
                store.set_value(ValueId::new(endpoint, property), value)?;
            },
            InterviewAction::MarkComplete => {
                store.set_value(ValueId::new(endpoint, INTERVIEW_COMPLETE), Value::Bool(true))?;
            },
        }
    }

    Ok(interview.state())
}

fn emit(endpoint: Endpoint, entry: &LogEntry) {
    match entry.level {
        LogLevel::Info => info!(
            node_id = endpoint.node_id,
            endpoint = endpoint.index,
            direction = %entry.direction,
            "{}",
            entry.message
        ),
        LogLevel::Warn => warn!(
            node_id = endpoint.node_id,
            endpoint = endpoint.index,
            direction = %entry.direction,
            "{}",
            entry.message
        ),
    }
}
