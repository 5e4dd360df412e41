//! `doorlog` command line tool.
//!
//! Decodes captured Door Lock Logging frames, encodes record queries and runs
//! the interview against a simulated lock. Output goes to a caller-supplied
//! writer so commands are testable without a terminal.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::{io::Write, time::Duration};

use clap::{Parser, Subcommand};
use doorlog_core::{
    ApiError, CommandOptions, DoorLockLoggingApi, Endpoint, InterviewState, MaybeKnown,
    MemoryStore, NodeId, RECORDS_COUNT, StorageError, Value, ValueId, ValueStore, run_interview,
};
use doorlog_harness::{SimDevice, SimTransport};
use doorlog_proto::{DoorLockLoggingRecord, Frame, Payload, ProtocolError, RecordGet};

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Input was not valid hex
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Frame could not be decoded or encoded
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Exchange with the lock failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Value store failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Writing output failed
    #[error("output: {0}")]
    Io(#[from] std::io::Error),
}

/// Door Lock Logging frame tool
#[derive(Debug, Parser)]
#[command(name = "doorlog")]
#[command(about = "Decode Door Lock Logging frames and interview simulated locks")]
#[command(version)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decode a hex-encoded frame (command class byte first)
    Decode {
        /// Frame bytes, whitespace allowed
        hex: String,
    },

    /// Encode a record query
    Get {
        /// Record slot, 0 for the latest record
        record: u8,
    },

    /// Interview a simulated lock and fetch its latest record
    Interview {
        /// Record slots the lock supports
        #[arg(long, default_value_t = 20)]
        records: u8,

        /// Events already in the lock's log
        #[arg(long, default_value_t = 3)]
        filled: u8,

        /// Seed for the generated log
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Node id of the simulated lock
        #[arg(long, default_value_t = 2)]
        node_id: NodeId,

        /// Lock never answers
        #[arg(long)]
        silent: bool,

        /// Reply timeout in milliseconds
        #[arg(long, default_value_t = 10_000)]
        timeout_ms: u64,
    },
}

/// Run `command`, writing results to `out`
///
/// # Errors
/// Returns the first decode, exchange or output failure
pub async fn run(command: Commands, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Commands::Decode { hex } => decode(&hex, out),
        Commands::Get { record } => {
            let frame = Payload::RecordGet(RecordGet::new(record)).into_frame()?;
            writeln!(out, "{}", hex::encode(frame.to_bytes()))?;
            Ok(())
        },
        Commands::Interview { records, filled, seed, node_id, silent, timeout_ms } => {
            let mut device = SimDevice::new(records).with_random_log(seed, filled);
            if silent {
                device = device.silent();
            }
            let options = CommandOptions::default().with_timeout(Duration::from_millis(timeout_ms));
            interview(device, Endpoint::new(node_id), options, out).await
        },
    }
}

fn decode(input: &str, out: &mut impl Write) -> Result<(), CliError> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = hex::decode(cleaned.trim_start_matches("0x"))?;

    let frame = Frame::decode(&bytes)?;
    let payload = frame.payload_decoded()?;
    writeln!(out, "{}: {}", frame.command().name(), payload.log_message())?;
    Ok(())
}

async fn interview(
    device: SimDevice,
    endpoint: Endpoint,
    options: CommandOptions,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let transport = SimTransport::connect(device);
    let api = DoorLockLoggingApi::new(&transport, endpoint).with_options(options);
    let store = MemoryStore::new();

    let state = run_interview(&api, &store).await?;
    writeln!(out, "{endpoint}: interview {state:?}")?;
    if state != InterviewState::Complete {
        return Ok(());
    }

    if let Some(Value::Number(count)) = store.get_value(&ValueId::new(endpoint, RECORDS_COUNT))? {
        writeln!(out, "records count: {count}")?;
    }

    match api.get_latest_record().await? {
        MaybeKnown::Known(Some(record)) => writeln!(out, "latest: {}", describe(&record))?,
        MaybeKnown::Known(None) => writeln!(out, "latest: (empty)")?,
        MaybeKnown::Unknown => writeln!(out, "latest: no reply")?,
    }
    Ok(())
}

fn describe(record: &DoorLockLoggingRecord) -> String {
    format!(
        "{} {} (user {}, code {})",
        record.timestamp_iso(),
        record.label,
        record.user_id,
        record.user_code.masked()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_string(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        let mut out = Vec::new();
        runtime.block_on(run(cli.command, &mut out)).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn decodes_record_report() {
        let output = run_to_string(&["doorlog", "decode", "4C04 01 07E8 06 0F 2E 1E 00 01 02 04 41424344"]);
        insta::assert_snapshot!(
            output.trim_end(),
            @"RecordReport: record #: 1, event type: Locked via Access Code, timestamp: 2024-06-15T14:30:00, user ID: 2, user code: ****"
        );
    }

    #[test]
    fn decodes_empty_slot_and_count() {
        let output = run_to_string(&["doorlog", "decode", "4c04 02 0000 00 00 00 00 00 00 00 00"]);
        insta::assert_snapshot!(output.trim_end(), @"RecordReport: record #: 2 (empty)");

        let output = run_to_string(&["doorlog", "decode", "0x4c0205"]);
        insta::assert_snapshot!(output.trim_end(), @"RecordsSupportedReport: supported no. of records: 5");
    }

    #[test]
    fn encodes_record_query() {
        assert_eq!(run_to_string(&["doorlog", "get", "7"]), "4c0307\n");
        assert_eq!(run_to_string(&["doorlog", "get", "0"]), "4c0300\n");
    }

    #[test]
    fn interview_reports_count() {
        let output =
            run_to_string(&["doorlog", "interview", "--records", "5", "--filled", "0", "--node-id", "9"]);
        insta::assert_snapshot!(output.trim_end(), @r"
        node 9: interview Complete
        records count: 5
        latest: (empty)
        ");
    }

    #[test]
    fn silent_lock_aborts() {
        let output =
            run_to_string(&["doorlog", "interview", "--silent", "--timeout-ms", "100", "--node-id", "4"]);
        assert_eq!(output, "node 4: interview Aborted\n");
    }

    #[test]
    fn rejects_bad_hex() {
        let cli = Cli::try_parse_from(["doorlog", "decode", "zz"]).unwrap();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let err = runtime.block_on(run(cli.command, &mut Vec::new())).unwrap_err();
        assert!(matches!(err, CliError::Hex(_)));
    }
}
