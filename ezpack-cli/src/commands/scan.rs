use anyhow::{Context, Result};
use ezpack_core::{
    encoder::format_frame,
    scanner::{scan_stream_with_stats, ScanStats},
};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

#[derive(Serialize, Deserialize)]
pub struct RecoveredPacket {
    pub offset: usize,
    pub packet_type: u8,
    pub payload_len: usize,
    pub size: usize,
    pub payload: String,
}

#[derive(Serialize, Deserialize)]
pub struct ScanReport {
    pub stats: ScanStats,
    pub packets: Vec<RecoveredPacket>,
}

pub fn execute(input: &str, output: Option<&str>, stats_only: bool) -> Result<ScanReport> {
    info!("Scanning file: {}", input);

    let data = fs::read(input).with_context(|| format!("Failed to read input file: {}", input))?;

    info!("File size: {} bytes", data.len());

    let (located, stats) = scan_stream_with_stats(&data);

    println!("\n=== Scan Results ===");
    println!("Bytes scanned:     {} bytes", stats.bytes_scanned);
    println!("Frame windows:     {}", stats.candidates_found);
    println!("Valid packets:     {}", stats.packets_found);
    println!("Checksum failures: {}", stats.checksum_failures);
    println!("Format failures:   {}", stats.format_failures);
    println!("Bytes recovered:   {} bytes", stats.bytes_recovered);
    println!("Recovery rate:     {:.2}%", stats.recovery_rate());
    println!();

    let packets = if stats_only {
        Vec::new()
    } else {
        located
            .iter()
            .map(|lp| RecoveredPacket {
                offset: lp.offset,
                packet_type: lp.packet.packet_type,
                payload_len: lp.packet.payload.len(),
                size: lp.size,
                payload: format_frame(&lp.packet.payload),
            })
            .collect()
    };

    let report = ScanReport { stats, packets };

    if stats_only {
        return Ok(report);
    }

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&report)
            .with_context(|| "Failed to serialize scan report")?;

        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;

        info!("Recovered packets written to: {}", output_path);
    } else {
        println!("=== Recovered Packets ===");
        for packet in &report.packets {
            println!(
                "Type {:#04x} @ offset {}: {} bytes [{}]",
                packet.packet_type, packet.offset, packet.size, packet.payload
            );
        }
    }

    Ok(report)
}
