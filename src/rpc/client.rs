//! HTTP transport for a NEAR JSON-RPC endpoint.

use super::endpoint::Endpoint;
use super::transport::{protocol_error, unwrap_envelope, validate_request, Transport};
use super::types::JsonRpcRequest;
use crate::utils::config::{is_write_method, RetryPolicy};
use crate::utils::error::{NearError, Result};
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::thread;
use std::time::Duration;

/// Longest response excerpt kept in a transport error message
const MAX_BODY_EXCERPT: usize = 512;

/// Blocking reqwest transport with retry and backoff
pub struct HttpTransport {
    client: Client,
    endpoint: Endpoint,
    retry: RetryPolicy,
}

impl HttpTransport {
    /// Create a transport for the given endpoint
    ///
    /// # Errors
    /// Returns `NearError::Transport` if the HTTP client cannot be built
    pub fn new(endpoint: Endpoint) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| NearError::transport("", None, e.to_string(), false))?;

        Ok(Self {
            client,
            endpoint,
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn set_endpoint(&mut self, endpoint: Endpoint) {
        self.endpoint = endpoint;
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Attempts allowed for a method; writes are never replayed
    fn attempts_for(&self, method: &str) -> u32 {
        if is_write_method(method) {
            1
        } else {
            self.retry.max_attempts.max(1)
        }
    }

    /// Single POST, no retries
    fn try_call(&self, request: &JsonRpcRequest<'_>, timeout: Duration) -> Result<Value> {
        let method = request.method;

        let response = self
            .client
            .post(self.endpoint.url())
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout)
            .json(request)
            .send()
            .map_err(|e| classify_request_error(method, e))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| classify_request_error(method, e))?;

        debug!("{} -> HTTP {} ({} bytes)", method, status, body.len());

        let parsed: Option<Value> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            // A JSON-RPC error envelope is final whatever the status says
            if let Some(error) = parsed
                .as_ref()
                .and_then(|v| v.get("error"))
                .filter(|e| !e.is_null())
            {
                return Err(protocol_error(method, error));
            }

            return Err(NearError::transport(
                method,
                Some(status.as_u16()),
                format!("HTTP {}: {}", status, excerpt(&body)),
                status.is_server_error(),
            ));
        }

        let body = parsed.ok_or_else(|| {
            NearError::format(method, format!("body is not valid JSON: {}", excerpt(&body)))
        })?;

        unwrap_envelope(method, body)
    }
}

impl Transport for HttpTransport {
    fn call(&self, method: &str, params: &Value, timeout: Duration) -> Result<Value> {
        validate_request(method, params, timeout)?;

        let request = JsonRpcRequest::new(method, params);
        let attempts = self.attempts_for(method);

        debug!("RPC request to {}: {:?}", self.endpoint, request);

        let mut attempt = 0;
        loop {
            match self.try_call(&request, timeout) {
                Ok(result) => return Ok(result),
                Err(err) if err.is_retryable() && attempt + 1 < attempts => {
                    let delay = self.retry.backoff_for(attempt);
                    warn!(
                        "{} attempt {}/{} failed: {}; retrying in {:?}",
                        method,
                        attempt + 1,
                        attempts,
                        err,
                        delay
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(NearError::Transport {
                    method,
                    status,
                    message,
                    retryable,
                }) if attempt > 0 => {
                    return Err(NearError::Transport {
                        method,
                        status,
                        message: format!("{} (after {} attempts)", message, attempt + 1),
                        retryable,
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Connection failures and timeouts are worth retrying; builder/decode errors aren't
fn classify_request_error(method: &str, err: reqwest::Error) -> NearError {
    let retryable = err.is_timeout() || err.is_connect() || err.is_request() || err.is_body();
    let status = err.status().map(|s| s.as_u16());
    NearError::transport(method, status, err.to_string(), retryable)
}

fn excerpt(body: &str) -> String {
    if body.len() <= MAX_BODY_EXCERPT {
        return body.to_string();
    }

    let mut end = MAX_BODY_EXCERPT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_methods_get_one_attempt() {
        let transport = HttpTransport::new(Endpoint::testnet()).unwrap();
        assert_eq!(transport.attempts_for("send_tx"), 1);
        assert_eq!(transport.attempts_for("block"), 3);
    }

    #[test]
    fn test_zero_attempt_policy_still_tries_once() {
        let transport = HttpTransport::new(Endpoint::testnet())
            .unwrap()
            .with_retry_policy(RetryPolicy {
                max_attempts: 0,
                ..RetryPolicy::default()
            });
        assert_eq!(transport.attempts_for("status"), 1);
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let body = "é".repeat(MAX_BODY_EXCERPT);
        let short = excerpt(&body);
        assert!(short.ends_with("..."));
        assert!(short.len() <= MAX_BODY_EXCERPT + 3);
        assert_eq!(excerpt("ok"), "ok");
    }

    #[test]
    fn test_invalid_request_fails_before_sending() {
        // Port 9 (discard) is never contacted because validation fails first
        let transport = HttpTransport::new(Endpoint::parse("http://127.0.0.1:9").unwrap())
            .unwrap();
        let err = transport
            .call("block", &Value::String("final".into()), Duration::from_secs(1))
            .unwrap_err();
        assert_eq!(err.kind(), crate::utils::error::ErrorKind::Validation);
    }
}
