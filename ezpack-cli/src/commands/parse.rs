use anyhow::{Context, Result};
use colored::*;
use ezpack_core::{decoder::try_parse_frame, encoder::format_frame, Packet};

use crate::parse_hex_bytes;

/// Parse one frame window given as hex
pub fn execute(frame_hex: &str) -> Result<Packet> {
    let window = parse_hex_bytes(frame_hex)?;

    let packet = try_parse_frame(&window)
        .with_context(|| format!("Invalid frame: {}", format_frame(&window)))?;

    println!("{} Valid frame", "✓".green());
    println!("Type:     {:#04x}", packet.packet_type);
    println!("Length:   {}", packet.payload.len());
    println!("Payload:  {}", format_frame(&packet.payload));
    println!("Checksum: {:#04x}", packet.checksum());

    Ok(packet)
}
