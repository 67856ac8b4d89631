//! `send_tx` and `tx`
//!
//! Both return the same outcome row. `send_tx` may instead come back with a
//! bare hash string (no-wait broadcasts), which gets a hash-only row.

use super::params::TxExecutionStatus;
use super::{expect_object, push, NearClient};
use crate::normalize::get;
use crate::rpc::Transport;
use crate::table::{Cell, ColumnType, Table, RAW_RESPONSE};
use crate::utils::error::Result;
use crate::utils::validate;
use log::{info, warn};
use serde_json::{json, Value};

const SEND_TX: &str = "send_tx";
const TX: &str = "tx";

/// Wait mode used by `send_tx` when the caller doesn't pick one
pub const DEFAULT_BROADCAST_WAIT: TxExecutionStatus = TxExecutionStatus::Executed;

pub const OUTCOME_COLUMNS: &[(&str, ColumnType)] = &[
    ("tx_hash", ColumnType::Text),
    ("signer_id", ColumnType::Text),
    ("receiver_id", ColumnType::Text),
    ("final_execution_status", ColumnType::Text),
    ("status", ColumnType::Json),
    ("transaction", ColumnType::Json),
    ("transaction_outcome", ColumnType::Json),
    ("receipts", ColumnType::Json),
    (RAW_RESPONSE, ColumnType::Json),
];

pub const HASH_ONLY_COLUMNS: &[(&str, ColumnType)] = &[
    ("tx_hash", ColumnType::Text),
    ("wait_until", ColumnType::Text),
    (RAW_RESPONSE, ColumnType::Json),
];

impl<T: Transport> NearClient<T> {
    /// Broadcast a signed, base64-encoded transaction
    ///
    /// `wait_until` is one of NONE, INCLUDED, INCLUDED_FINAL, EXECUTED, FINAL
    /// (default EXECUTED). The HTTP transport never retries this call.
    pub fn send_tx(&self, signed_tx_base64: &str, wait_until: Option<&str>) -> Result<Table> {
        validate::base64("signed_tx_base64", signed_tx_base64)?;
        let wait_until = match wait_until {
            Some(mode) => mode.parse::<TxExecutionStatus>()?,
            None => DEFAULT_BROADCAST_WAIT,
        };

        let params = json!({
            "signed_tx_base64": signed_tx_base64,
            "wait_until": wait_until.as_str(),
        });

        info!("Broadcasting transaction (wait_until={})", wait_until);
        let raw = self.rpc(SEND_TX, params)?;

        if let Value::String(hash) = &raw {
            let mut table = Table::new(HASH_ONLY_COLUMNS);
            push(
                SEND_TX,
                &mut table,
                vec![
                    Cell::Text(Some(hash.clone())),
                    Cell::Text(Some(wait_until.as_str().to_string())),
                    Cell::Json(Some(raw.clone())),
                ],
            )?;
            return Ok(table);
        }

        outcome_table(SEND_TX, raw)
    }

    /// Status of a previously submitted transaction
    pub fn tx_status(
        &self,
        tx_hash: &str,
        sender_account_id: &str,
        wait_until: &str,
    ) -> Result<Table> {
        validate::hash("tx_hash", tx_hash)?;
        validate::account_id("sender_account_id", sender_account_id)?;
        let wait_until: TxExecutionStatus = wait_until.parse()?;

        let params = json!({
            "tx_hash": tx_hash,
            "sender_account_id": sender_account_id,
            "wait_until": wait_until.as_str(),
        });

        info!("Fetching status of transaction {}", tx_hash);
        let raw = self.rpc(TX, params)?;

        let table = outcome_table(TX, raw)?;
        if table.get(0, "tx_hash").map_or(true, |c| c.is_missing()) {
            warn!("Outcome for {} carries no transaction yet", tx_hash);
        }
        Ok(table)
    }
}

/// One outcome row; `receipts` falls back to `receipts_outcome`, then to `[]`
fn outcome_table(method: &str, raw: Value) -> Result<Table> {
    expect_object(method, &raw)?;

    let receipts: Option<Value> = get(&raw, "receipts");
    let receipts = receipts
        .or_else(|| get(&raw, "receipts_outcome"))
        .unwrap_or_else(|| json!([]));

    let mut table = Table::new(OUTCOME_COLUMNS);
    push(
        method,
        &mut table,
        vec![
            Cell::Text(get(&raw, "transaction.hash")),
            Cell::Text(get(&raw, "transaction.signer_id")),
            Cell::Text(get(&raw, "transaction.receiver_id")),
            Cell::Text(get(&raw, "final_execution_status")),
            Cell::Json(get(&raw, "status")),
            Cell::Json(get(&raw, "transaction")),
            Cell::Json(get(&raw, "transaction_outcome")),
            Cell::Json(Some(receipts)),
            Cell::Json(Some(raw)),
        ],
    )?;

    Ok(table)
}
