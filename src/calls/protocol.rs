//! `EXPERIMENTAL_protocol_config`

use super::params::{BlockId, BlockReference, Finality};
use super::{expect_object, push, NearClient};
use crate::rpc::Transport;
use crate::table::{Cell, ColumnType, Table, RAW_RESPONSE};
use crate::utils::error::Result;
use log::info;
use serde_json::Value;

const METHOD: &str = "EXPERIMENTAL_protocol_config";

pub const PROTOCOL_CONFIG_COLUMNS: &[(&str, ColumnType)] = &[
    ("finality", ColumnType::Text),
    ("block_id", ColumnType::Text),
    ("config", ColumnType::Json),
    (RAW_RESPONSE, ColumnType::Json),
];

impl<T: Transport> NearClient<T> {
    /// Protocol configuration at a block, kept whole as nested JSON
    pub fn protocol_config(
        &self,
        finality: Option<Finality>,
        block_id: Option<BlockId>,
    ) -> Result<Table> {
        let reference = BlockReference::from_parts(finality, block_id)?;
        let params = reference.to_params()?;

        info!("Fetching protocol config at {:?}", reference);
        let raw = self.rpc(METHOD, Value::Object(params))?;
        expect_object(METHOD, &raw)?;

        let (finality, block_id) = match &reference {
            BlockReference::Finality(finality) => (Some(finality.to_string()), None),
            BlockReference::BlockId(block_id) => (None, Some(block_id.to_string())),
        };

        let mut table = Table::new(PROTOCOL_CONFIG_COLUMNS);
        push(
            METHOD,
            &mut table,
            vec![
                Cell::Text(finality),
                Cell::Text(block_id),
                Cell::Json(Some(raw.clone())),
                Cell::Json(Some(raw)),
            ],
        )?;

        Ok(table)
    }
}
