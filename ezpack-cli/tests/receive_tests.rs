use std::fs;
use tempfile::tempdir;

use ezpack_cli::commands::receive::{self, ReceiveOptions};

fn options(input: &str) -> ReceiveOptions {
    ReceiveOptions {
        input: input.to_string(),
        timeout_secs: Some(2.0),
        count: None,
        poll_interval_ms: 10,
        progress: false,
    }
}

fn capture() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&[0xAA, 0x01, 0x02, 0xAA, 0xAA, 0x03, 0x55]);
    data.extend_from_slice(&[0xAA, 0x01, 0x02, 0xBE, 0xEF, 0x00, 0x55]);
    data.extend_from_slice(b"noise");
    data.extend_from_slice(&[0xAA, 0x01, 0x02, 0xBE, 0xEF, 0x52, 0x55]);
    data
}

#[test]
fn receive_reads_file_until_end() {
    let td = tempdir().unwrap();
    let path = td.path().join("capture.bin");
    fs::write(&path, capture()).unwrap();

    let summary = receive::execute(&options(path.to_str().unwrap())).unwrap();

    assert_eq!(summary.packets.len(), 2);
    assert_eq!(summary.packets[1].payload.as_ref(), &[0xBE, 0xEF]);
    assert_eq!(summary.stats.checksum_failures, 1);
    assert!(!summary.timed_out);
}

#[test]
fn receive_stops_after_count() {
    let td = tempdir().unwrap();
    let path = td.path().join("capture.bin");
    fs::write(&path, capture()).unwrap();

    let mut opts = options(path.to_str().unwrap());
    opts.count = Some(1);
    let summary = receive::execute(&opts).unwrap();

    assert_eq!(summary.packets.len(), 1);
    assert_eq!(summary.packets[0].payload.as_ref(), &[0xAA, 0xAA]);
}

#[test]
fn receive_rejects_negative_timeout() {
    let td = tempdir().unwrap();
    let path = td.path().join("capture.bin");
    fs::write(&path, capture()).unwrap();

    let mut opts = options(path.to_str().unwrap());
    opts.timeout_secs = Some(-1.0);
    assert!(receive::execute(&opts).is_err());
}

#[test]
fn receive_missing_input_fails() {
    let td = tempdir().unwrap();
    let missing = td.path().join("missing.bin");
    assert!(receive::execute(&options(missing.to_str().unwrap())).is_err());
}
