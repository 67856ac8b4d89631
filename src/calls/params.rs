//! Typed arguments for the call functions.

use crate::utils::error::{NearError, Result};
use crate::utils::validate;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// How confirmed the queried state must be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Finality {
    /// Fastest available, may still be reverted
    Optimistic,
    NearFinal,
    /// Irreversible
    #[default]
    Final,
}

impl Finality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Finality::Optimistic => "optimistic",
            Finality::NearFinal => "near-final",
            Finality::Final => "final",
        }
    }
}

impl FromStr for Finality {
    type Err = NearError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(Finality::Optimistic),
            "near-final" | "near_final" => Ok(Finality::NearFinal),
            "final" => Ok(Finality::Final),
            _ => Err(NearError::validation(format!(
                "finality '{}' must be one of optimistic, near-final, final",
                s
            ))),
        }
    }
}

impl fmt::Display for Finality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A specific block, by height or hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockId {
    Height(u64),
    Hash(String),
}

impl BlockId {
    /// Heights are sent as numbers, hashes as strings
    pub fn to_json(&self) -> Value {
        match self {
            BlockId::Height(height) => json!(height),
            BlockId::Hash(hash) => json!(hash),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            BlockId::Height(_) => Ok(()),
            BlockId::Hash(hash) => validate::hash("block_id", hash),
        }
    }
}

impl FromStr for BlockId {
    type Err = NearError;

    /// Anything that fits a `u64` is a height, anything else must be a block hash
    ///
    /// Base58 hashes can be all digits (`111...1`), so an overflowing number is
    /// tried as a hash rather than rejected as a height.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(height) = s.parse::<u64>() {
            return Ok(BlockId::Height(height));
        }

        validate::hash("block_id", s)?;
        Ok(BlockId::Hash(s.to_string()))
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Height(height) => write!(f, "{}", height),
            BlockId::Hash(hash) => f.write_str(hash),
        }
    }
}

/// A finality keyword or a specific block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReference {
    Finality(Finality),
    BlockId(BlockId),
}

impl Default for BlockReference {
    fn default() -> Self {
        BlockReference::Finality(Finality::Final)
    }
}

impl BlockReference {
    pub fn from_parts(finality: Option<Finality>, block_id: Option<BlockId>) -> Result<Self> {
        validate::exclusive(&finality, &block_id)?;
        Ok(match (finality, block_id) {
            (_, Some(block_id)) => BlockReference::BlockId(block_id),
            (Some(finality), None) => BlockReference::Finality(finality),
            (None, None) => BlockReference::default(),
        })
    }

    /// `{"finality": ..}` or `{"block_id": ..}`
    pub fn to_params(&self) -> Result<Map<String, Value>> {
        let mut params = Map::new();
        match self {
            BlockReference::Finality(finality) => {
                params.insert("finality".into(), json!(finality.as_str()));
            }
            BlockReference::BlockId(block_id) => {
                block_id.validate()?;
                params.insert("block_id".into(), block_id.to_json());
            }
        }
        Ok(params)
    }
}

impl FromStr for BlockReference {
    type Err = NearError;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(finality) = s.parse::<Finality>() {
            return Ok(BlockReference::Finality(finality));
        }
        s.parse::<BlockId>().map(BlockReference::BlockId)
    }
}

/// How long the node should wait before answering a transaction call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxExecutionStatus {
    None,
    Included,
    IncludedFinal,
    Executed,
    Final,
}

impl TxExecutionStatus {
    pub const ALL: [TxExecutionStatus; 5] = [
        TxExecutionStatus::None,
        TxExecutionStatus::Included,
        TxExecutionStatus::IncludedFinal,
        TxExecutionStatus::Executed,
        TxExecutionStatus::Final,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TxExecutionStatus::None => "NONE",
            TxExecutionStatus::Included => "INCLUDED",
            TxExecutionStatus::IncludedFinal => "INCLUDED_FINAL",
            TxExecutionStatus::Executed => "EXECUTED",
            TxExecutionStatus::Final => "FINAL",
        }
    }
}

impl FromStr for TxExecutionStatus {
    type Err = NearError;

    /// One of the five wire names, matched case-insensitively (`final` is `FINAL`)
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                NearError::validation(format!(
                    "wait_until '{}' must be one of {}",
                    s,
                    Self::ALL.map(|status| status.as_str()).join(", ")
                ))
            })
    }
}

impl fmt::Display for TxExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which epoch's validator set to fetch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EpochLocator {
    #[default]
    Latest,
    /// Epoch containing the given block
    Block(BlockId),
    EpochId(String),
}

impl EpochLocator {
    /// Positional `[null]` / `[block]`, or `{"epoch_id": ..}`
    pub fn to_params(&self) -> Result<Value> {
        match self {
            EpochLocator::Latest => Ok(json!([null])),
            EpochLocator::Block(block_id) => {
                block_id.validate()?;
                Ok(json!([block_id.to_json()]))
            }
            EpochLocator::EpochId(epoch_id) => {
                validate::hash("epoch_id", epoch_id)?;
                Ok(json!({ "epoch_id": epoch_id }))
            }
        }
    }
}
