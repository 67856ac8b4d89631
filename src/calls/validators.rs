//! `validators`: current validator set with stake and uptime.

use super::params::EpochLocator;
use super::{expect_object, push, NearClient};
use crate::normalize::{get, uptime_percent, yocto_to_near};
use crate::rpc::Transport;
use crate::table::{Cell, ColumnType, Table, RAW_RESPONSE};
use crate::utils::error::Result;
use log::{info, warn};
use serde_json::Value;
use std::cmp::Ordering;

const METHOD: &str = "validators";

pub const VALIDATOR_COLUMNS: &[(&str, ColumnType)] = &[
    ("account_id", ColumnType::Text),
    ("public_key", ColumnType::Text),
    ("stake", ColumnType::Text),
    ("stake_near", ColumnType::Float),
    ("is_slashed", ColumnType::Boolean),
    ("num_produced_blocks", ColumnType::Integer),
    ("num_expected_blocks", ColumnType::Integer),
    ("num_produced_chunks", ColumnType::Integer),
    ("num_expected_chunks", ColumnType::Integer),
    ("uptime_pct", ColumnType::Float),
    ("shards", ColumnType::Json),
    ("epoch_height", ColumnType::Integer),
    ("epoch_start_height", ColumnType::Integer),
    (RAW_RESPONSE, ColumnType::Json),
];

impl<T: Transport> NearClient<T> {
    /// Current validators, largest stake first
    ///
    /// `stake` stays the exact yocto string; `stake_near` is the display-scale
    /// float. An empty validator set logs a warning and returns an empty table.
    pub fn validators(&self, epoch: EpochLocator) -> Result<Table> {
        let params = epoch.to_params()?;

        info!("Fetching validators for {:?}", epoch);
        let raw = self.rpc(METHOD, params)?;
        expect_object(METHOD, &raw)?;

        let epoch_height: Option<i64> = get(&raw, "epoch_height");
        let epoch_start_height: Option<i64> = get(&raw, "epoch_start_height");
        let current: Vec<Value> = get(&raw, "current_validators");

        let mut table = Table::new(VALIDATOR_COLUMNS);
        if current.is_empty() {
            warn!("Validator set is empty (epoch {:?})", epoch);
            return Ok(table);
        }

        let mut rows: Vec<(Option<f64>, Vec<Cell>)> = current
            .into_iter()
            .map(|validator| {
                let stake: Option<String> = get(&validator, "stake");
                let stake_near = stake.as_deref().and_then(yocto_to_near);

                let produced_blocks: Option<u64> = get(&validator, "num_produced_blocks");
                let expected_blocks: Option<u64> = get(&validator, "num_expected_blocks");
                let produced_chunks: Option<u64> = get(&validator, "num_produced_chunks");
                let expected_chunks: Option<u64> = get(&validator, "num_expected_chunks");
                let uptime = uptime_percent(
                    produced_blocks.unwrap_or(0),
                    expected_blocks.unwrap_or(0),
                    produced_chunks.unwrap_or(0),
                    expected_chunks.unwrap_or(0),
                );

                let cells = vec![
                    Cell::Text(get(&validator, "account_id")),
                    Cell::Text(get(&validator, "public_key")),
                    Cell::Text(stake),
                    Cell::Float(stake_near),
                    Cell::Boolean(get(&validator, "is_slashed")),
                    Cell::Integer(to_i64(produced_blocks)),
                    Cell::Integer(to_i64(expected_blocks)),
                    Cell::Integer(to_i64(produced_chunks)),
                    Cell::Integer(to_i64(expected_chunks)),
                    Cell::Float(Some(uptime)),
                    Cell::Json(Some(Value::Array(get(&validator, "shards")))),
                    Cell::Integer(epoch_height),
                    Cell::Integer(epoch_start_height),
                    Cell::Json(Some(validator)),
                ];
                (stake_near, cells)
            })
            .collect();

        rows.sort_by(|(a, _), (b, _)| compare_stake_desc(*a, *b));

        for (_, cells) in rows {
            push(METHOD, &mut table, cells)?;
        }

        Ok(table)
    }
}

fn to_i64(value: Option<u64>) -> Option<i64> {
    value.and_then(|v| i64::try_from(v).ok())
}

/// Descending by stake; validators with unreadable stake go last
fn compare_stake_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
