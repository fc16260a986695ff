//! Hex parsing for command arguments

use alloy_primitives::{hex, Bytes};

use super::{OhioError, Result};

/// Decodes a hex string, handling an optional 0x prefix. Empty input decodes to empty bytes.
pub fn decode_hex(s: &str) -> Result<Bytes> {
    let s = s.trim();
    let hex_str = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);

    if hex_str.len() % 2 != 0 {
        return Err(OhioError::InvalidInput(format!(
            "Invalid hex string length: {} (must be even)",
            hex_str.len()
        )));
    }

    Ok(hex::decode(hex_str)?.into())
}
