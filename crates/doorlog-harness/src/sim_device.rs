//! Simulated door lock.
//!
//! Holds an audit log with `records_count` slots. Slot `n` (1-based) holds the
//! `n`-th logged event; slot 0 in a query means "latest" and is answered with
//! the newest occupied slot.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use doorlog_proto::{
    Command, DoorLockLoggingRecord, EventType, Frame, LATEST_RECORD_NUMBER, Payload, RecordReport,
    RecordsSupportedReport, UserCode,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Simulated lock that answers Door Lock Logging queries
#[derive(Debug, Clone)]
pub struct SimDevice {
    records_count: u8,
    log: Vec<DoorLockLoggingRecord>,
    silent: bool,
    stray_reports: bool,
    reply_delay: Duration,
}

impl SimDevice {
    /// Lock with `records_count` empty slots
    pub fn new(records_count: u8) -> Self {
        Self {
            records_count,
            log: Vec::new(),
            silent: false,
            stray_reports: false,
            reply_delay: Duration::ZERO,
        }
    }

    /// Append an event to the audit log. Events past capacity are dropped.
    #[must_use]
    pub fn with_record(mut self, record: DoorLockLoggingRecord) -> Self {
        if self.log.len() < usize::from(self.records_count) {
            self.log.push(record);
        }
        self
    }

    /// Fill `count` slots with events drawn from a seeded RNG
    #[must_use]
    pub fn with_random_log(mut self, seed: u64, count: u8) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut timestamp = base_timestamp();

        for _ in 0..count {
            timestamp += TimeDelta::minutes(rng.gen_range(1..=600));
            let event = rng.gen_range(1..=EventType::NewBattery.to_u8());
            let user_id = rng.gen_range(0..=5);
            let code_len = rng.gen_range(0..=6);
            let code: String = (0..code_len).map(|_| char::from(rng.gen_range(b'0'..=b'9'))).collect();

            self = self.with_record(DoorLockLoggingRecord::new(
                event,
                timestamp,
                user_id,
                UserCode::Text(code),
            ));
        }
        self
    }

    /// Never answer anything
    #[must_use]
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    /// Send a report for the wrong slot before each real record report
    #[must_use]
    pub fn with_stray_reports(mut self) -> Self {
        self.stray_reports = true;
        self
    }

    /// Delay every reply
    #[must_use]
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    /// Configured reply delay
    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    /// Logged events, oldest first
    pub fn log(&self) -> &[DoorLockLoggingRecord] {
        &self.log
    }

    /// Frames the lock sends back for `frame`
    pub fn handle(&self, frame: &Frame) -> Vec<Frame> {
        if self.silent {
            debug!(command = frame.command().name(), "sim device ignoring frame");
            return Vec::new();
        }

        let replies = match frame.command() {
            Command::RecordsSupportedGet => vec![Payload::RecordsSupportedReport(
                RecordsSupportedReport { records_count: self.records_count },
            )],
            // Lock side reads the slot byte directly; controllers never parse RecordGet
            Command::RecordGet => match frame.payload().first() {
                Some(&requested) => self.record_replies(requested),
                None => Vec::new(),
            },
            Command::RecordsSupportedReport | Command::RecordReport => Vec::new(),
        };

        replies.into_iter().filter_map(|payload| payload.into_frame().ok()).collect()
    }

    fn record_replies(&self, requested: u8) -> Vec<Payload> {
        let slot = if requested == LATEST_RECORD_NUMBER { self.log.len() as u8 } else { requested };
        let mut replies = Vec::with_capacity(2);

        if self.stray_reports && requested != LATEST_RECORD_NUMBER {
            let stray = slot.wrapping_add(1);
            replies.push(Payload::RecordReport(self.report(stray)));
        }

        replies.push(Payload::RecordReport(self.report(slot)));
        replies
    }

    fn report(&self, slot: u8) -> RecordReport {
        match self.slot(slot) {
            Some(record) => RecordReport::occupied(slot, record.clone()),
            None => RecordReport::empty(slot),
        }
    }

    fn slot(&self, slot: u8) -> Option<&DoorLockLoggingRecord> {
        usize::from(slot).checked_sub(1).and_then(|index| self.log.get(index))
    }
}

fn base_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use doorlog_proto::RecordGet;

    use super::*;

    fn decode(frames: &[Frame]) -> Vec<Payload> {
        frames.iter().map(|f| f.payload_decoded().unwrap()).collect()
    }

    fn record_get(n: u8) -> Frame {
        Payload::RecordGet(RecordGet::new(n)).into_frame().unwrap()
    }

    #[test]
    fn answers_records_supported() {
        let device = SimDevice::new(20);
        let get = Payload::RecordsSupportedGet(doorlog_proto::RecordsSupportedGet)
            .into_frame()
            .unwrap();

        assert_eq!(decode(&device.handle(&get)), vec![Payload::RecordsSupportedReport(
            RecordsSupportedReport { records_count: 20 }
        )]);
    }

    #[test]
    fn latest_is_newest_slot() {
        let device = SimDevice::new(10).with_random_log(7, 3);
        let replies = decode(&device.handle(&record_get(0)));

        let [Payload::RecordReport(report)] = replies.as_slice() else {
            panic!("expected one record report, got {replies:?}");
        };
        assert_eq!(report.record_number, 3);
        assert_eq!(report.record.as_ref(), device.log().last());
    }

    #[test]
    fn unused_slot_is_empty() {
        let device = SimDevice::new(10).with_random_log(7, 3);
        let replies = decode(&device.handle(&record_get(9)));
        assert_eq!(replies, vec![Payload::RecordReport(RecordReport::empty(9))]);
    }

    #[test]
    fn random_log_is_deterministic_and_bounded() {
        let a = SimDevice::new(4).with_random_log(42, 10);
        let b = SimDevice::new(4).with_random_log(42, 10);
        assert_eq!(a.log(), b.log());
        assert_eq!(a.log().len(), 4);
        assert!(a.log().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    proptest::proptest! {
        #[test]
        fn log_never_exceeds_capacity(capacity in 0u8..32, filled in 0u8..64, seed in proptest::prelude::any::<u64>()) {
            let device = SimDevice::new(capacity).with_random_log(seed, filled);
            proptest::prop_assert_eq!(device.log().len(), usize::from(capacity.min(filled)));
        }
    }

    #[test]
    fn silent_device_never_answers() {
        let device = SimDevice::new(10).silent();
        assert!(device.handle(&record_get(1)).is_empty());
    }
}
