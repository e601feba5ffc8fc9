use anyhow::Result;
use clap::{Parser, Subcommand};
use ezpack_cli::{commands, parse_u8, receive::ReceiveOptions};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ezpack")]
#[command(about = "EZPack - framed packets over unreliable byte links", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn byte_arg(s: &str) -> Result<u8, String> {
    parse_u8(s).map_err(|e| e.to_string())
}

#[derive(Subcommand)]
enum Commands {
    /// Build one frame from a type and a hex payload
    Build {
        /// Packet type, decimal or 0x-prefixed hex
        #[arg(short = 't', long = "type", value_parser = byte_arg)]
        packet_type: u8,

        /// Payload bytes as hex (e.g. "BE EF")
        #[arg(short, long, default_value = "")]
        payload: String,

        /// Also write the raw frame to this file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Parse a single frame given as hex
    Parse {
        /// Frame bytes as hex (e.g. "AA 01 02 BE EF 52 55")
        #[arg(short, long)]
        frame: String,
    },

    /// Pack a JSON array of packets into a frame file
    Pack {
        /// Input JSON file (array of {"type", "payload" | "text"})
        #[arg(short, long)]
        input: String,

        /// Output file for packed frames
        #[arg(short, long)]
        output: String,
    },

    /// Scan a captured byte stream and recover packets
    Scan {
        /// Input file to scan
        #[arg(short, long)]
        input: String,

        /// Output JSON file for the scan report
        #[arg(short, long)]
        output: Option<String>,

        /// Show statistics only
        #[arg(long)]
        stats_only: bool,
    },

    /// Receive packets from a file, device node, or stdin
    Receive {
        /// Input path, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Seconds to wait for each packet (default: until input ends)
        #[arg(long)]
        timeout: Option<f64>,

        /// Stop after this many packets
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Longest single wait for new bytes, in milliseconds
        #[arg(long, default_value = "500")]
        poll_interval_ms: u64,

        /// Show a spinner while waiting
        #[arg(long)]
        progress: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Build {
            packet_type,
            payload,
            output,
        } => commands::build::execute(packet_type, &payload, output.as_deref()).map(|_| ()),

        Commands::Parse { frame } => commands::parse::execute(&frame).map(|_| ()),

        Commands::Pack { input, output } => commands::pack::execute(&input, &output).map(|_| ()),

        Commands::Scan {
            input,
            output,
            stats_only,
        } => commands::scan::execute(&input, output.as_deref(), stats_only).map(|_| ()),

        Commands::Receive {
            input,
            timeout,
            count,
            poll_interval_ms,
            progress,
        } => commands::receive::execute(&ReceiveOptions {
            input,
            timeout_secs: timeout,
            count,
            poll_interval_ms,
            progress,
        })
        .map(|_| ()),
    }
}
