//! Fuzz target for the table parser.
//!
//! The CSV/TSV parser must never panic on malformed input, whatever
//! delimiter it detects.

#![no_main]

use cartwise::Parser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Parser::new().parse_str(text);
    }
    let _ = Parser::new().parse_bytes(data, b',');
});
