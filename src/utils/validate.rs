//! Argument validation shared by the call functions.
//!
//! Everything here runs before any network activity and only ever returns
//! [`NearError::Validation`].

use super::error::{NearError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const MIN_ACCOUNT_ID_LEN: usize = 2;
const MAX_ACCOUNT_ID_LEN: usize = 64;
const HASH_LEN: usize = 32;

/// Check a NEAR account id
///
/// Named accounts are 2-64 chars of `a-z0-9` separated by single `-`, `_` or `.`.
/// Implicit accounts (64 hex chars) pass the same rule.
pub fn account_id(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(NearError::validation(format!("{} is required", field)));
    }

    if value.len() < MIN_ACCOUNT_ID_LEN || value.len() > MAX_ACCOUNT_ID_LEN {
        return Err(NearError::validation(format!(
            "{} '{}' must be {}-{} characters long",
            field, value, MIN_ACCOUNT_ID_LEN, MAX_ACCOUNT_ID_LEN
        )));
    }

    let mut prev_separator = true; // a leading separator is invalid
    for c in value.chars() {
        match c {
            'a'..='z' | '0'..='9' => prev_separator = false,
            '-' | '_' | '.' => {
                if prev_separator {
                    return Err(invalid_account(field, value));
                }
                prev_separator = true;
            }
            _ => return Err(invalid_account(field, value)),
        }
    }

    if prev_separator {
        return Err(invalid_account(field, value));
    }

    Ok(())
}

fn invalid_account(field: &str, value: &str) -> NearError {
    NearError::validation(format!(
        "{} '{}' is not a valid NEAR account id",
        field, value
    ))
}

/// Check a base58-encoded 32-byte hash (block or transaction)
pub fn hash(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(NearError::validation(format!("{} is required", field)));
    }

    let decoded = bs58::decode(value).into_vec().map_err(|e| {
        NearError::validation(format!("{} '{}' is not valid base58: {}", field, value, e))
    })?;

    if decoded.len() != HASH_LEN {
        return Err(NearError::validation(format!(
            "{} '{}' decodes to {} bytes, expected {}",
            field,
            value,
            decoded.len(),
            HASH_LEN
        )));
    }

    Ok(())
}

/// Check a base64 payload (signed transactions)
pub fn base64(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NearError::validation(format!("{} is required", field)));
    }

    STANDARD.decode(value).map_err(|e| {
        NearError::validation(format!("{} is not valid base64: {}", field, e))
    })?;

    Ok(())
}

/// Check that a free-form string argument is present
pub fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NearError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Reject a finality hint combined with an explicit block locator
pub fn exclusive<A, B>(finality: &Option<A>, block_id: &Option<B>) -> Result<()> {
    if finality.is_some() && block_id.is_some() {
        return Err(NearError::validation(
            "finality and block_id are mutually exclusive: specify one, not both",
        ));
    }
    Ok(())
}
