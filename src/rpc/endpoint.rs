//! Endpoint configuration: named network shortcuts or explicit URLs.

use crate::utils::config::{ARCHIVAL_RPC_URL, MAINNET_RPC_URL, TESTNET_RPC_URL};
use crate::utils::error::{NearError, Result};
use std::fmt;
use std::str::FromStr;

/// Named shortcuts and the URLs they resolve to
pub const SHORTCUTS: &[(&str, &str)] = &[
    ("mainnet", MAINNET_RPC_URL),
    ("testnet", TESTNET_RPC_URL),
    ("archival", ARCHIVAL_RPC_URL),
];

/// An RPC base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: String,
}

impl Endpoint {
    /// Resolve a shortcut (`mainnet`, `testnet`, `archival`) or accept an http(s) URL
    ///
    /// # Errors
    /// `NearError::Validation` for anything else
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();

        if let Some((_, url)) = SHORTCUTS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        {
            return Ok(Self {
                url: (*url).to_string(),
            });
        }

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Self {
                url: trimmed.to_string(),
            });
        }

        Err(NearError::validation(format!(
            "endpoint '{}' must be one of {} or an http(s):// URL",
            value,
            SHORTCUTS
                .iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }

    pub fn mainnet() -> Self {
        Self {
            url: MAINNET_RPC_URL.to_string(),
        }
    }

    pub fn testnet() -> Self {
        Self {
            url: TESTNET_RPC_URL.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl FromStr for Endpoint {
    type Err = NearError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
