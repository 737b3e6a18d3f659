#![no_main]
//! Fuzz target for event stream framing and decoding
//!
//! Feeds random bytes through the line buffer in two chunks and decodes
//! every completed record, the way the event connector does.

use libfuzzer_sys::fuzz_target;

use dock::event::WindowEvent;
use dock::ipc::LineBuffer;

fuzz_target!(|data: &[u8]| {
    let split = data.first().map(|&b| b as usize % (data.len() + 1)).unwrap_or(0);
    let (head, tail) = data.split_at(split);

    let mut buffer = LineBuffer::new();
    let records = buffer.push(head).into_iter().chain(buffer.push(tail));
    for record in records {
        // Must never panic, whatever the payload
        let _ = WindowEvent::decode(&record);
    }
});
