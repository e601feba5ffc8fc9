//! Send and receive over a loopback link (TX wired to RX)

use ezpack_core::{extractor::ExtractorConfig, transport::MemoryTransport, PacketLink};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ExtractorConfig::new().poll_interval(Duration::from_millis(10));
    let mut link = PacketLink::with_config(MemoryTransport::loopback(), config);

    for payload in [[0xAA, 0xAA], [0xBB, 0xBB], [0xCC, 0xCC]] {
        link.send_packet(0x01, &payload)?;
        match link.receive_packet(Some(Duration::from_secs(1)))? {
            Some(packet) => println!(
                "Received type={}, payload={:?}",
                packet.packet_type,
                packet.payload.as_ref()
            ),
            None => println!("Timed out"),
        }
    }

    link.close()?;
    Ok(())
}
