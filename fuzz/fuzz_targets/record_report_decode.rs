//! Fuzz RecordReport payloads.
//!
//! Whatever decodes must re-encode to a payload that decodes to the same
//! report.

#![no_main]

use doorlog_proto::RecordReport;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(report) = RecordReport::decode(data) else {
        return;
    };

    let Ok(encoded) = report.encode() else {
        return;
    };
    let reparsed = RecordReport::decode(&encoded);
    assert_eq!(reparsed.as_ref(), Ok(&report));
});
