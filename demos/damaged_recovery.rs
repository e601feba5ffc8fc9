//! Example demonstrating resynchronization on a damaged link

use ezpack_core::{
    encoder::encode_packet,
    extractor::{DiscardReason, ExtractorConfig},
    scanner::scan_stream_with_stats,
    transport::MemoryTransport,
    PacketLink,
};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("EZPack Damaged Link Recovery Example\n");

    // Step 1: Create a clean stream with 10 packets
    println!("Step 1: Creating 10 packets...");
    let mut stream = Vec::new();
    for i in 1..=10u8 {
        let payload = format!("reading {}", i);
        stream.extend_from_slice(&encode_packet(i, payload.as_bytes())?);
    }
    println!("Created clean stream: {} bytes\n", stream.len());

    // Step 2: Simulate line noise
    println!("Step 2: Simulating damage...");
    stream[20] ^= 0x08;
    println!("Flipped one bit at offset 20");
    stream.splice(40..40, [0x00, 0xFF, 0x13, 0x37]);
    println!("Inserted 4 noise bytes at offset 40");
    stream.drain(70..72);
    println!("Dropped 2 bytes at offset 70\n");

    // Step 3: Offline scan of the capture
    println!("Step 3: Scanning damaged capture...");
    let (_, stats) = scan_stream_with_stats(&stream);
    println!("  Candidates:        {}", stats.candidates_found);
    println!("  Valid packets:     {}", stats.packets_found);
    println!("  Checksum failures: {}", stats.checksum_failures);
    println!("  Format failures:   {}", stats.format_failures);
    println!("  Recovery rate:     {:.1}%\n", stats.recovery_rate());

    // Step 4: Receive the same bytes as a live, fragmented link
    println!("Step 4: Receiving over a fragmented link...");
    let mut transport = MemoryTransport::new();
    transport.push_fragmented(&stream, 3);

    let config = ExtractorConfig::new().poll_interval(Duration::from_millis(10));
    let mut link = PacketLink::with_config(transport, config);
    link.extractor_mut().set_discard_hook(|event| {
        if let DiscardReason::Invalid(e) = &event.reason {
            println!("  dropped {} bytes: {}", event.bytes.len(), e);
        }
    });

    while let Some(packet) = link.receive_packet(Some(Duration::from_millis(100)))? {
        println!(
            "  type={:#04x} payload={}",
            packet.packet_type,
            String::from_utf8_lossy(&packet.payload)
        );
    }

    let stats = link.stats();
    println!(
        "\nReceived {} packets, discarded {} bytes",
        stats.packets_received, stats.bytes_discarded
    );

    Ok(())
}
