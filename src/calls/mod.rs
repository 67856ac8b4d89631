//! One function per remote method, each returning a [`Table`](crate::table::Table).
//!
//! Every call follows the same shape: validate arguments, build params, send them
//! through the client's [`Transport`], check the response shape, then default-fill
//! fields into a table.

pub mod access_keys;
pub mod account;
pub mod block;
pub mod contract;
pub mod network;
pub mod params;
pub mod protocol;
pub mod transaction;
pub mod validators;

pub use params::{BlockId, BlockReference, EpochLocator, Finality, TxExecutionStatus};

use crate::rpc::transport::{json_type_name, validate_request};
use crate::rpc::{Endpoint, HttpTransport, Transport};
use crate::table::{Cell, Table, TableError};
use crate::utils::config::{ClientConfig, DEFAULT_RPC_TIMEOUT};
use crate::utils::error::{NearError, Result};
use log::debug;
use serde_json::{Map, Value};
use std::time::Duration;

/// Client owning a transport and a per-attempt timeout
pub struct NearClient<T = HttpTransport> {
    transport: T,
    timeout: Duration,
}

impl NearClient<HttpTransport> {
    /// HTTP client for a shortcut (`mainnet`, `testnet`, `archival`) or URL
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::from_config(ClientConfig::new(Endpoint::parse(endpoint)?))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.endpoint)?.with_retry_policy(config.retry);
        NearClient::with_transport(transport).with_timeout(config.timeout)
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.transport.endpoint()
    }

    /// Point the client at another shortcut or URL
    ///
    /// # Errors
    /// `NearError::Validation` if `value` is neither; the old endpoint is kept
    pub fn set_endpoint(&mut self, value: &str) -> Result<()> {
        let endpoint = Endpoint::parse(value)?;
        self.transport.set_endpoint(endpoint);
        Ok(())
    }
}

impl<T: Transport> NearClient<T> {
    /// Client over any transport (closures included)
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            timeout: DEFAULT_RPC_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.set_timeout(timeout)?;
        Ok(self)
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        if timeout.is_zero() {
            return Err(NearError::validation("timeout must be greater than zero"));
        }
        self.timeout = timeout;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate and send one request
    fn rpc(&self, method: &str, params: Value) -> Result<Value> {
        validate_request(method, &params, self.timeout)?;
        debug!("Calling {} with params {}", method, params);
        self.transport.call(method, &params, self.timeout)
    }

    /// `query` call with the given `request_type`
    ///
    /// NEAR reports some query failures in-band as `result.error`; those become
    /// protocol errors here.
    fn query(&self, request_type: &str, mut params: Map<String, Value>) -> Result<Value> {
        params.insert("request_type".into(), Value::from(request_type));
        let result = self.rpc(QUERY, Value::Object(params))?;
        expect_object(QUERY, &result)?;

        if let Some(message) = result.get("error").and_then(Value::as_str) {
            return Err(NearError::Protocol {
                method: QUERY.to_string(),
                code: None,
                message: message.to_string(),
                cause: None,
                data: Some(result.clone()),
            });
        }

        Ok(result)
    }
}

const QUERY: &str = "query";

/// Fail with a format error unless the payload is a JSON object
fn expect_object(method: &str, value: &Value) -> Result<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(NearError::format(
            method,
            format!("expected a JSON object, got {}", json_type_name(value)),
        ))
    }
}

fn push(method: &str, table: &mut Table, cells: Vec<Cell>) -> Result<()> {
    table
        .push_row(cells)
        .map_err(|e: TableError| NearError::format(method, e.to_string()))
}
