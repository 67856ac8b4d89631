//! `query` / `view_access_key_list`

use super::params::{BlockId, BlockReference, Finality};
use super::{push, NearClient, QUERY};
use crate::normalize::get;
use crate::rpc::Transport;
use crate::table::{Cell, ColumnType, Table, RAW_RESPONSE};
use crate::utils::error::Result;
use crate::utils::validate;
use log::{debug, info};
use serde_json::Value;

pub const ACCESS_KEY_COLUMNS: &[(&str, ColumnType)] = &[
    ("account_id", ColumnType::Text),
    ("public_key", ColumnType::Text),
    ("nonce", ColumnType::Integer),
    ("permission", ColumnType::Text),
    ("allowance", ColumnType::Text),
    ("receiver_id", ColumnType::Text),
    ("method_names", ColumnType::Json),
    ("block_height", ColumnType::Integer),
    ("block_hash", ColumnType::Text),
    (RAW_RESPONSE, ColumnType::Json),
];

impl<T: Transport> NearClient<T> {
    /// All access keys of an account, one row per key
    ///
    /// An account without keys gives an empty table. `raw_response` holds each
    /// key's own entry.
    pub fn view_access_key_list(
        &self,
        account_id: &str,
        finality: Option<Finality>,
        block_id: Option<BlockId>,
    ) -> Result<Table> {
        validate::account_id("account_id", account_id)?;
        let mut params = BlockReference::from_parts(finality, block_id)?.to_params()?;
        params.insert("account_id".into(), account_id.into());

        info!("Listing access keys of {}", account_id);
        let raw = self.query("view_access_key_list", params)?;

        let keys: Vec<Value> = get(&raw, "keys");
        debug!("{} has {} access keys", account_id, keys.len());

        let block_height: Option<i64> = get(&raw, "block_height");
        let block_hash: Option<String> = get(&raw, "block_hash");

        let mut table = Table::new(ACCESS_KEY_COLUMNS);
        for key in keys {
            let permission = Permission::from_entry(&key);
            push(
                QUERY,
                &mut table,
                vec![
                    Cell::Text(Some(account_id.to_string())),
                    Cell::Text(get(&key, "public_key")),
                    Cell::Integer(get(&key, "access_key.nonce")),
                    Cell::Text(permission.kind),
                    Cell::Text(permission.allowance),
                    Cell::Text(permission.receiver_id),
                    Cell::Json(permission.method_names),
                    Cell::Integer(block_height),
                    Cell::Text(block_hash.clone()),
                    Cell::Json(Some(key)),
                ],
            )?;
        }

        Ok(table)
    }
}

/// Flattened `access_key.permission`
///
/// The node sends either the string `"FullAccess"` or
/// `{"FunctionCall": {"allowance", "receiver_id", "method_names"}}`.
#[derive(Debug, Default, PartialEq)]
struct Permission {
    kind: Option<String>,
    allowance: Option<String>,
    receiver_id: Option<String>,
    method_names: Option<Value>,
}

impl Permission {
    fn from_entry(key: &Value) -> Self {
        match get::<Value>(key, "access_key.permission") {
            Value::String(kind) => Self {
                kind: Some(kind),
                ..Self::default()
            },
            Value::Object(map) => match map.into_iter().next() {
                Some((kind, scope)) => Self {
                    allowance: get(&scope, "allowance"),
                    receiver_id: get(&scope, "receiver_id"),
                    method_names: Some(Value::Array(get(&scope, "method_names"))),
                    kind: Some(kind),
                },
                None => Self::default(),
            },
            _ => Self::default(),
        }
    }
}
