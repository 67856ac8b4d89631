//! Decoding of contract view-call result bytes.
//!
//! Nodes return the bytes either as a JSON array of integers or as a base64
//! string. After the raw bytes, text and JSON decoding are each best-effort.

use crate::rpc::transport::json_type_name;
use crate::utils::error::{NearError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;

/// View-call result in all the forms we could recover
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBytes {
    pub bytes: Vec<u8>,

    /// `None` when the bytes are not valid UTF-8
    pub text: Option<String>,

    /// `None` when there is no text or the text is not JSON
    pub json: Option<Value>,
}

impl DecodedBytes {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let text = String::from_utf8(bytes.clone()).ok();
        let json = text
            .as_deref()
            .and_then(|t| serde_json::from_str::<Value>(t).ok());

        Self { bytes, text, json }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Decode a `result` field from a `call_function` query
///
/// A missing (`null`) result is treated as empty output.
///
/// # Errors
/// `NearError::Format` if the value is neither a byte array nor a base64 string
pub fn decode_result_bytes(method: &str, value: &Value) -> Result<DecodedBytes> {
    let bytes = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| {
                        NearError::format(
                            method,
                            format!("result byte {} is not an integer in 0..=255: {}", i, item),
                        )
                    })
            })
            .collect::<Result<Vec<u8>>>()?,
        Value::String(encoded) => STANDARD.decode(encoded.trim()).map_err(|e| {
            NearError::format(method, format!("result is not valid base64: {}", e))
        })?,
        other => {
            return Err(NearError::format(
                method,
                format!(
                    "result must be a byte array or base64 string, got {}",
                    json_type_name(other)
                ),
            ));
        }
    };

    Ok(DecodedBytes::from_bytes(bytes))
}
