//! Client-wide defaults.

use crate::rpc::Endpoint;
use std::time::Duration;

/// Per-attempt timeout for a single RPC request
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Total attempts (first try included) for retryable failures
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay before the second attempt; doubles after every failure
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Upper bound for a single backoff delay
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Fixed `id` sent in every JSON-RPC envelope
pub const JSONRPC_CLIENT_ID: &str = "near-rpc-tables";

/// JSON-RPC protocol version
pub const JSONRPC_VERSION: &str = "2.0";

pub const MAINNET_RPC_URL: &str = "https://rpc.mainnet.near.org";
pub const TESTNET_RPC_URL: &str = "https://rpc.testnet.near.org";
pub const ARCHIVAL_RPC_URL: &str = "https://archival-rpc.mainnet.near.org";

/// Yocto-units per NEAR
pub const YOCTO_PER_NEAR: u128 = 1_000_000_000_000_000_000_000_000;

/// Added to the expected-production denominator so idle validators don't divide by zero
pub const UPTIME_EPSILON: f64 = 1e-9;

/// Remote methods that take positional (array) params
pub const POSITIONAL_METHODS: &[&str] = &["validators"];

/// Remote methods that mutate chain state and must not be replayed blindly
pub const WRITE_METHODS: &[&str] = &["send_tx", "broadcast_tx_async", "broadcast_tx_commit"];

/// Retry behaviour for the HTTP transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (minimum 1)
    pub max_attempts: u32,

    /// Delay before the second attempt
    pub initial_backoff: Duration,

    /// Cap on any single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no backoff
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after the given (zero-based) failed attempt
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Everything needed to build an HTTP-backed client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: Endpoint,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Endpoint::default())
    }
}

impl ClientConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            timeout: DEFAULT_RPC_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Whether a remote method writes to chain state
pub fn is_write_method(method: &str) -> bool {
    WRITE_METHODS.contains(&method)
}

/// Whether a remote method expects positional params
pub fn accepts_positional_params(method: &str) -> bool {
    POSITIONAL_METHODS.contains(&method)
}
