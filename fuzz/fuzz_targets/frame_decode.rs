//! Fuzz arbitrary bytes through frame and payload decoding.
//!
//! Decoding must never panic. A frame that decodes and re-encodes must yield
//! the input bytes.

#![no_main]

use doorlog_proto::Frame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(frame) = Frame::decode(data) else {
        return;
    };

    assert_eq!(&frame.to_bytes()[..], data);

    // Errors are fine, panics are not
    let _ = frame.payload_decoded();
});
