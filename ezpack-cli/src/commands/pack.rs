use anyhow::{bail, Context, Result};
use bytes::BytesMut;
use ezpack_core::encoder::encode_packet_into;
use serde::Deserialize;
use std::fs;
use tracing::info;

use crate::parse_hex_bytes;

/// One packet description in the input file
#[derive(Deserialize)]
struct PackEntry {
    #[serde(rename = "type")]
    packet_type: u8,

    /// Payload as hex
    #[serde(default)]
    payload: Option<String>,

    /// Payload as UTF-8 text
    #[serde(default)]
    text: Option<String>,
}

/// Pack a JSON array of packets into concatenated frames
///
/// Each entry is `{"type": 1, "payload": "BEEF"}` or `{"type": 1, "text": "hello"}`.
/// Returns the number of frames written.
pub fn execute(input: &str, output: &str) -> Result<usize> {
    info!("Packing packets from {} to {}", input, output);

    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input))?;

    let entries: Vec<PackEntry> =
        serde_json::from_str(&content).with_context(|| "Failed to parse JSON input")?;

    info!("Found {} packets to pack", entries.len());

    let mut output_data = BytesMut::new();

    for (i, entry) in entries.iter().enumerate() {
        let payload = match (&entry.payload, &entry.text) {
            (Some(_), Some(_)) => bail!("Entry {} has both payload and text", i),
            (Some(hex_payload), None) => parse_hex_bytes(hex_payload)
                .with_context(|| format!("Bad payload in entry {}", i))?,
            (None, Some(text)) => text.as_bytes().to_vec(),
            (None, None) => Vec::new(),
        };

        encode_packet_into(entry.packet_type, &payload, &mut output_data)
            .with_context(|| format!("Failed to encode entry {}", i))?;
    }

    fs::write(output, &output_data)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    info!(
        "Successfully packed {} frames ({} bytes total)",
        entries.len(),
        output_data.len()
    );

    Ok(entries.len())
}
