//! The transport seam between call functions and the network.
//!
//! Call functions only ever see [`Transport`]; the HTTP implementation lives in
//! [`super::client`], and tests substitute plain closures.

use super::types::JsonRpcError;
use crate::utils::config::accepts_positional_params;
use crate::utils::error::{NearError, Result};
use serde_json::Value;
use std::time::Duration;

/// Sends one JSON-RPC call and returns the unwrapped `result`
pub trait Transport {
    /// # Arguments
    /// * `method` - Remote method name (e.g. "block")
    /// * `params` - Parameter object (array only for positional methods)
    /// * `timeout` - Per-attempt timeout
    ///
    /// # Errors
    /// Any [`NearError`] kind except `Format` for a shape the caller didn't expect
    fn call(&self, method: &str, params: &Value, timeout: Duration) -> Result<Value>;
}

impl<F> Transport for F
where
    F: Fn(&str, &Value, Duration) -> Result<Value>,
{
    fn call(&self, method: &str, params: &Value, timeout: Duration) -> Result<Value> {
        self(method, params, timeout)
    }
}

/// Check a request before anything goes on the wire
pub fn validate_request(method: &str, params: &Value, timeout: Duration) -> Result<()> {
    if method.trim().is_empty() {
        return Err(NearError::validation("RPC method name must not be empty"));
    }

    match params {
        Value::Object(_) => {}
        Value::Array(_) if accepts_positional_params(method) => {}
        Value::Array(_) => {
            return Err(NearError::validation(format!(
                "'{}' takes named params; got an array",
                method
            )));
        }
        other => {
            return Err(NearError::validation(format!(
                "params for '{}' must be a JSON object, got {}",
                method,
                json_type_name(other)
            )));
        }
    }

    if timeout.is_zero() {
        return Err(NearError::validation("timeout must be greater than zero"));
    }

    Ok(())
}

/// Pull `result` out of a decoded response body
///
/// A non-null `error` wins. A body without `result` is returned whole, since some
/// endpoints drop the envelope.
pub fn unwrap_envelope(method: &str, body: Value) -> Result<Value> {
    match body {
        Value::Object(mut obj) => {
            if let Some(error) = obj.get("error").filter(|e| !e.is_null()) {
                return Err(protocol_error(method, error));
            }

            match obj.remove("result") {
                Some(result) => Ok(result),
                None => Ok(Value::Object(obj)),
            }
        }
        other => Ok(other),
    }
}

/// Convert a JSON-RPC error object into `NearError::Protocol`
pub fn protocol_error(method: &str, error: &Value) -> NearError {
    if let Some(text) = error.as_str() {
        return NearError::Protocol {
            method: method.to_string(),
            code: None,
            message: text.to_string(),
            cause: None,
            data: None,
        };
    }

    let parsed: JsonRpcError = serde_json::from_value(error.clone()).unwrap_or_default();

    // Fall back to the serialized object when the node sends no message
    let message = parsed
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| error.to_string());

    NearError::Protocol {
        method: method.to_string(),
        code: parsed.code,
        message,
        cause: parsed.cause.and_then(|c| c.name),
        data: parsed.data,
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
