//! `block`

use super::params::BlockReference;
use super::{expect_object, push, NearClient};
use crate::normalize::{get, nanos_to_datetime};
use crate::rpc::Transport;
use crate::table::{Cell, ColumnType, Table, RAW_RESPONSE};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use log::info;
use serde_json::Value;

const METHOD: &str = "block";

pub const BLOCK_COLUMNS: &[(&str, ColumnType)] = &[
    ("height", ColumnType::Integer),
    ("hash", ColumnType::Text),
    ("prev_hash", ColumnType::Text),
    ("author", ColumnType::Text),
    ("epoch_id", ColumnType::Text),
    ("timestamp", ColumnType::Timestamp),
    ("gas_price", ColumnType::Text),
    ("total_supply", ColumnType::Text),
    ("chunk_count", ColumnType::Integer),
    (RAW_RESPONSE, ColumnType::Json),
];

impl<T: Transport> NearClient<T> {
    /// Fetch one block header
    ///
    /// `None` means the latest final block.
    pub fn block(&self, locator: Option<BlockReference>) -> Result<Table> {
        let locator = locator.unwrap_or_default();
        let params = locator.to_params()?;

        info!("Fetching block {:?}", locator);
        let raw = self.rpc(METHOD, Value::Object(params))?;
        expect_object(METHOD, &raw)?;

        let chunks: Vec<Value> = get(&raw, "chunks");

        let mut table = Table::new(BLOCK_COLUMNS);
        push(
            METHOD,
            &mut table,
            vec![
                Cell::Integer(get(&raw, "header.height")),
                Cell::Text(get(&raw, "header.hash")),
                Cell::Text(get(&raw, "header.prev_hash")),
                Cell::Text(get(&raw, "author")),
                Cell::Text(get(&raw, "header.epoch_id")),
                Cell::Timestamp(block_timestamp(&raw)),
                Cell::Text(get(&raw, "header.gas_price")),
                Cell::Text(get(&raw, "header.total_supply")),
                Cell::Integer(i64::try_from(chunks.len()).ok()),
                Cell::Json(Some(raw)),
            ],
        )?;

        Ok(table)
    }
}

/// Header time in nanoseconds; the string form is exact, the numeric one is a fallback
fn block_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    let nanos: Option<u64> = get(raw, "header.timestamp_nanosec");
    let nanos = nanos.or_else(|| get(raw, "header.timestamp"))?;
    nanos_to_datetime(nanos)
}
