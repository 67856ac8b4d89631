//! `query` / `call_function`: read-only contract calls.

use super::params::{BlockId, BlockReference, Finality};
use super::{push, NearClient, QUERY};
use crate::normalize::{decode_result_bytes, get};
use crate::rpc::Transport;
use crate::table::{Cell, ColumnType, Table, RAW_RESPONSE};
use crate::utils::error::{NearError, Result};
use crate::utils::validate;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, info};
use serde_json::{json, Value};

pub const CALL_FUNCTION_COLUMNS: &[(&str, ColumnType)] = &[
    ("account_id", ColumnType::Text),
    ("method_name", ColumnType::Text),
    ("block_height", ColumnType::Integer),
    ("block_hash", ColumnType::Text),
    ("logs", ColumnType::Json),
    ("result_base64", ColumnType::Text),
    ("result_text", ColumnType::Text),
    ("result_json", ColumnType::Json),
    (RAW_RESPONSE, ColumnType::Json),
];

impl<T: Transport> NearClient<T> {
    /// Call a view method on a contract
    ///
    /// `args` is serialized to JSON and base64-encoded; `None` sends `{}`.
    /// The result bytes are exposed three ways: base64, UTF-8 text (missing if
    /// not text) and parsed JSON (missing if not JSON).
    pub fn call_function(
        &self,
        account_id: &str,
        method_name: &str,
        args: Option<&Value>,
        finality: Option<Finality>,
        block_id: Option<BlockId>,
    ) -> Result<Table> {
        validate::account_id("account_id", account_id)?;
        validate::non_empty("method_name", method_name)?;
        let mut params = BlockReference::from_parts(finality, block_id)?.to_params()?;

        let args_json = serde_json::to_vec(args.unwrap_or(&json!({})))
            .map_err(|e| NearError::validation(format!("args are not serializable: {}", e)))?;

        params.insert("account_id".into(), account_id.into());
        params.insert("method_name".into(), method_name.into());
        params.insert("args_base64".into(), STANDARD.encode(&args_json).into());

        info!("Calling view method {}.{}", account_id, method_name);
        let raw = self.query("call_function", params)?;

        let result: Value = get(&raw, "result");
        let decoded = decode_result_bytes(QUERY, &result)?;
        debug!(
            "{}.{} returned {} bytes (text: {}, json: {})",
            account_id,
            method_name,
            decoded.bytes.len(),
            decoded.text.is_some(),
            decoded.json.is_some()
        );

        let logs: Vec<Value> = get(&raw, "logs");

        let mut table = Table::new(CALL_FUNCTION_COLUMNS);
        push(
            QUERY,
            &mut table,
            vec![
                Cell::Text(Some(account_id.to_string())),
                Cell::Text(Some(method_name.to_string())),
                Cell::Integer(get(&raw, "block_height")),
                Cell::Text(get(&raw, "block_hash")),
                Cell::Json(Some(Value::Array(logs))),
                Cell::Text(Some(decoded.to_base64())),
                Cell::Text(decoded.text),
                Cell::Json(decoded.json),
                Cell::Json(Some(raw)),
            ],
        )?;

        Ok(table)
    }
}
