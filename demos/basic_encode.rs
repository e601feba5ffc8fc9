//! Basic encoding example

use ezpack_core::encoder::{encode_packet_struct, format_frame, PacketBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("EZPack Basic Encoding Example\n");

    let payloads: [&[u8]; 3] = [&[0xAA, 0xAA], &[0xBB, 0xBB], &[0xCC, 0xCC]];
    let mut output = Vec::new();

    for (i, payload) in payloads.iter().enumerate() {
        let packet = PacketBuilder::new(0x01).payload(payload).build_packet()?;
        let encoded = encode_packet_struct(&packet)?;

        println!(
            "Packet {}: {} ({} bytes, checksum {:#04x})",
            i + 1,
            format_frame(&encoded),
            encoded.len(),
            packet.checksum()
        );
        output.extend_from_slice(&encoded);
    }

    std::fs::write("example_output.ezp", &output)?;

    println!("\nWrote {} bytes to example_output.ezp", output.len());
    println!("Use 'ezpack scan --input example_output.ezp' to read it back");

    Ok(())
}
