use anyhow::{bail, Context, Result};
use colored::*;
use ezpack_core::{
    encoder::format_frame,
    extractor::{ExtractorConfig, ExtractorStats},
    transport::StreamTransport,
    LinkError, Packet, PacketLink,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, Read};
use std::time::Duration;
use tracing::{info, warn};

/// Options for the `receive` command
#[derive(Debug, Clone)]
pub struct ReceiveOptions {
    /// File, device node, or `-` for stdin
    pub input: String,
    /// Seconds to wait for each packet; `None` waits until the source ends
    pub timeout_secs: Option<f64>,
    /// Stop after this many packets
    pub count: Option<usize>,
    /// Longest single wait for new bytes
    pub poll_interval_ms: u64,
    /// Show a spinner while waiting
    pub progress: bool,
}

/// What a receive session produced
#[derive(Debug)]
pub struct ReceiveSummary {
    pub packets: Vec<Packet>,
    pub stats: ExtractorStats,
    pub timed_out: bool,
}

fn open_source(input: &str) -> Result<Box<dyn Read + Send>> {
    if input == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        let file =
            File::open(input).with_context(|| format!("Failed to open input: {}", input))?;
        Ok(Box::new(file))
    }
}

/// Stream a byte source through a packet link and print every valid packet
pub fn execute(opts: &ReceiveOptions) -> Result<ReceiveSummary> {
    let timeout = match opts.timeout_secs {
        Some(secs) => Some(
            Duration::try_from_secs_f64(secs)
                .with_context(|| format!("Invalid timeout: {}", secs))?,
        ),
        None => None,
    };
    if opts.poll_interval_ms == 0 {
        bail!("Poll interval must be at least 1 ms");
    }

    info!("Receiving from {}", opts.input);

    let source = open_source(&opts.input)?;
    let transport = StreamTransport::spawn(source, io::sink())
        .with_context(|| "Failed to start transport reader")?;
    let config = ExtractorConfig::new().poll_interval(Duration::from_millis(opts.poll_interval_ms));
    let mut link = PacketLink::with_config(transport, config);

    let spinner = if opts.progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let mut packets = Vec::new();
    let mut timed_out = false;

    loop {
        if opts.count.is_some_and(|n| packets.len() >= n) {
            break;
        }

        match link.receive_packet(timeout) {
            Ok(Some(packet)) => {
                let line = format!(
                    "type={:#04x} len={} payload=[{}]",
                    packet.packet_type,
                    packet.payload.len(),
                    format_frame(&packet.payload)
                );
                match &spinner {
                    Some(pb) => {
                        pb.println(&line);
                        pb.set_message(format!("{} packets", packets.len() + 1));
                    }
                    None => println!("{}", line),
                }
                packets.push(packet);
            }
            Ok(None) => {
                warn!("Timeout waiting for packet");
                timed_out = true;
                break;
            }
            Err(LinkError::Closed) => {
                info!("Input ended");
                break;
            }
            Err(e) => return Err(e).with_context(|| format!("Failed reading {}", opts.input)),
        }
    }

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let stats = link.stats().clone();
    link.close().with_context(|| "Failed to close transport")?;

    println!("\n=== Receive Summary ===");
    println!("Packets received:  {}", stats.packets_received.to_string().green());
    if stats.checksum_failures + stats.format_failures > 0 {
        println!("Checksum failures: {}", stats.checksum_failures.to_string().red());
        println!("Format failures:   {}", stats.format_failures.to_string().red());
    } else {
        println!("Checksum failures: {}", stats.checksum_failures);
        println!("Format failures:   {}", stats.format_failures);
    }
    println!("Bytes discarded:   {}", stats.bytes_discarded);
    if timed_out {
        println!("{} Stopped on timeout", "!".yellow());
    }

    Ok(ReceiveSummary {
        packets,
        stats,
        timed_out,
    })
}
