//! `query` / `view_account`

use super::params::{BlockId, BlockReference, Finality};
use super::{push, NearClient, QUERY};
use crate::normalize::get;
use crate::rpc::Transport;
use crate::table::{Cell, ColumnType, Table, RAW_RESPONSE};
use crate::utils::error::Result;
use crate::utils::validate;
use log::info;

pub const ACCOUNT_COLUMNS: &[(&str, ColumnType)] = &[
    ("account_id", ColumnType::Text),
    ("amount", ColumnType::Text),
    ("locked", ColumnType::Text),
    ("code_hash", ColumnType::Text),
    ("storage_usage", ColumnType::Integer),
    ("storage_paid_at", ColumnType::Integer),
    ("block_height", ColumnType::Integer),
    ("block_hash", ColumnType::Text),
    (RAW_RESPONSE, ColumnType::Json),
];

impl<T: Transport> NearClient<T> {
    /// Balance and storage details for one account
    ///
    /// `amount` and `locked` are yocto-unit decimal strings exactly as the node
    /// sent them.
    ///
    /// # Errors
    /// * `Validation` - bad account id, or both `finality` and `block_id`
    /// * `Transport` / `Protocol` / `Format` - from the call itself
    pub fn view_account(
        &self,
        account_id: &str,
        finality: Option<Finality>,
        block_id: Option<BlockId>,
    ) -> Result<Table> {
        validate::account_id("account_id", account_id)?;
        let mut params = BlockReference::from_parts(finality, block_id)?.to_params()?;
        params.insert("account_id".into(), account_id.into());

        info!("Fetching account {}", account_id);
        let raw = self.query("view_account", params)?;

        // view_account doesn't echo the id today; prefer it if a node does
        let echoed: Option<String> = get(&raw, "account_id");

        let mut table = Table::new(ACCOUNT_COLUMNS);
        push(
            QUERY,
            &mut table,
            vec![
                Cell::Text(Some(echoed.unwrap_or_else(|| account_id.to_string()))),
                Cell::Text(get(&raw, "amount")),
                Cell::Text(get(&raw, "locked")),
                Cell::Text(get(&raw, "code_hash")),
                Cell::Integer(get(&raw, "storage_usage")),
                Cell::Integer(get(&raw, "storage_paid_at")),
                Cell::Integer(get(&raw, "block_height")),
                Cell::Text(get(&raw, "block_hash")),
                Cell::Json(Some(raw)),
            ],
        )?;

        Ok(table)
    }
}
