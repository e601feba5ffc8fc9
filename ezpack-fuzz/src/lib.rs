//! Fuzzing entry points for ezpack-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Call these functions from a fuzz target, e.g. `cargo fuzz run fuzz_extract`

use ezpack_core::extractor::StreamExtractor;

pub fn fuzz_parse(data: &[u8]) {
    use ezpack_core::decoder::try_parse_frame;

    // Try to parse - should never panic
    let _ = try_parse_frame(data);
}

pub fn fuzz_scan(data: &[u8]) {
    use ezpack_core::scanner::scan_stream;

    // Try to scan - should never panic
    let _ = scan_stream(data);
}

/// First byte picks the chunk size, the rest is the stream
pub fn fuzz_extract(data: &[u8]) {
    let Some((&chunk, stream)) = data.split_first() else {
        return;
    };

    let mut extractor = StreamExtractor::new();
    for piece in stream.chunks(chunk.max(1) as usize) {
        extractor.extend(piece);
        while extractor.next_packet().is_some() {}
    }
}
