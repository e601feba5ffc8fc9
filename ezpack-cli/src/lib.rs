//! Library entry for ezpack-cli used by integration tests and embedding.

pub mod commands;

// Re-export commands for convenience
pub use commands::*;

use anyhow::{bail, Context, Result};

/// Parse a byte given as decimal (`17`) or hex (`0x11`)
pub fn parse_u8(s: &str) -> Result<u8> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex_digits) => u8::from_str_radix(hex_digits, 16),
        None => s.parse::<u8>(),
    };
    parsed.with_context(|| format!("Invalid byte value: {}", s))
}

/// Parse bytes written as hex, tolerating spaces, commas and `0x` prefixes
///
/// `"AA 01 02"`, `"aa0102"` and `"0xAA,0x01,0x02"` all give the same bytes.
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>> {
    let cleaned: String = s
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|tok| {
            tok.strip_prefix("0x")
                .or_else(|| tok.strip_prefix("0X"))
                .unwrap_or(tok)
        })
        .collect();

    if cleaned.len() % 2 != 0 {
        bail!("Hex input has an odd number of digits: {}", s);
    }

    hex::decode(&cleaned).with_context(|| format!("Invalid hex input: {}", s))
}
