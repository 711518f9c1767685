//! Parsing of user supplied addresses and numbers

use std::str::FromStr;

use solana_pubkey::Pubkey;

use crate::errors::{GeneratorError, GeneratorResult};

/// Parse a base-58 address, naming the field on failure
pub fn parse_pubkey(field: &str, value: &str) -> GeneratorResult<Pubkey> {
    Pubkey::from_str(value.trim()).map_err(|e| GeneratorError::InvalidAddress {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a hex encoded foreign chain address, with or without a `0x` prefix
pub fn parse_remote_address(field: &str, value: &str) -> GeneratorResult<Vec<u8>> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|e| GeneratorError::InvalidAddress {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if bytes.is_empty() || bytes.len() > 64 {
        return Err(GeneratorError::InvalidAddress {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("expected 1 to 64 bytes, got {}", bytes.len()),
        });
    }
    Ok(bytes)
}

/// Parse a comma separated list of base-58 addresses
pub fn parse_pubkey_list(field: &str, value: &str) -> GeneratorResult<Vec<Pubkey>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_pubkey(field, s))
        .collect()
}
