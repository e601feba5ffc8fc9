use anyhow::{Context, Result};
use ezpack_core::encoder::{encode_packet, format_frame};
use std::fs;
use tracing::info;

use crate::parse_hex_bytes;

/// Build one frame and print it as hex; optionally write the raw bytes
pub fn execute(packet_type: u8, payload_hex: &str, output: Option<&str>) -> Result<String> {
    let payload = parse_hex_bytes(payload_hex)?;

    let frame = encode_packet(packet_type, &payload)
        .with_context(|| format!("Failed to build frame of type {:#04x}", packet_type))?;
    let rendered = format_frame(&frame);

    println!("{}", rendered);

    if let Some(path) = output {
        fs::write(path, &frame)
            .with_context(|| format!("Failed to write output file: {}", path))?;
        info!("Wrote {} bytes to {}", frame.len(), path);
    }

    Ok(rendered)
}
