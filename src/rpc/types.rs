//! JSON-RPC 2.0 envelope types.

use crate::utils::config::{JSONRPC_CLIENT_ID, JSONRPC_VERSION};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: &'static str,
    pub method: &'a str,
    pub params: &'a Value,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(method: &'a str, params: &'a Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: JSONRPC_CLIENT_ID,
            method,
            params,
        }
    }
}

/// Structured view of a JSON-RPC error object
///
/// NEAR adds a `name`/`cause` pair on top of the standard `code`/`message`/`data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonRpcError {
    #[serde(default)]
    pub code: Option<i64>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub data: Option<Value>,

    #[serde(default)]
    pub cause: Option<ErrorCause>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorCause {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub info: Option<Value>,
}
