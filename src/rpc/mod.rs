//! JSON-RPC plumbing: endpoint configuration, envelopes, and transports.

pub mod client;
pub mod endpoint;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::HttpTransport;
pub use endpoint::Endpoint;
pub use transport::Transport;
pub use types::JsonRpcRequest;
