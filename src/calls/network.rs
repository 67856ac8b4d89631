//! `status`

use super::{expect_object, push, NearClient};
use crate::normalize::get;
use crate::rpc::Transport;
use crate::table::{Cell, ColumnType, Table, RAW_RESPONSE};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use log::info;
use serde_json::{Map, Value};

const METHOD: &str = "status";

pub const STATUS_COLUMNS: &[(&str, ColumnType)] = &[
    ("chain_id", ColumnType::Text),
    ("protocol_version", ColumnType::Integer),
    ("latest_protocol_version", ColumnType::Integer),
    ("version", ColumnType::Text),
    ("build", ColumnType::Text),
    ("latest_block_height", ColumnType::Integer),
    ("latest_block_hash", ColumnType::Text),
    ("latest_block_time", ColumnType::Timestamp),
    ("syncing", ColumnType::Boolean),
    ("validator_count", ColumnType::Integer),
    ("validators", ColumnType::Json),
    (RAW_RESPONSE, ColumnType::Json),
];

impl<T: Transport> NearClient<T> {
    /// Node and chain status
    pub fn status(&self) -> Result<Table> {
        info!("Fetching node status");
        let raw = self.rpc(METHOD, Value::Object(Map::new()))?;
        expect_object(METHOD, &raw)?;

        let validators: Vec<Value> = get(&raw, "validators");
        let latest_block_time: Option<String> = get(&raw, "sync_info.latest_block_time");

        let mut table = Table::new(STATUS_COLUMNS);
        push(
            METHOD,
            &mut table,
            vec![
                Cell::Text(get(&raw, "chain_id")),
                Cell::Integer(get(&raw, "protocol_version")),
                Cell::Integer(get(&raw, "latest_protocol_version")),
                Cell::Text(get(&raw, "version.version")),
                Cell::Text(get(&raw, "version.build")),
                Cell::Integer(get(&raw, "sync_info.latest_block_height")),
                Cell::Text(get(&raw, "sync_info.latest_block_hash")),
                Cell::Timestamp(latest_block_time.as_deref().and_then(parse_rfc3339)),
                Cell::Boolean(get(&raw, "sync_info.syncing")),
                Cell::Integer(i64::try_from(validators.len()).ok()),
                Cell::Json(Some(Value::Array(validators))),
                Cell::Json(Some(raw)),
            ],
        )?;

        Ok(table)
    }
}

fn parse_rfc3339(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
