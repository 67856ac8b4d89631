//! Typed, tabular access to the NEAR JSON-RPC API
//!
//! Each call function on [`NearClient`] sends one JSON-RPC request through a
//! [`Transport`] and normalizes the answer into a [`Table`].
//!
//! ```no_run
//! use near_rpc_tables::NearClient;
//!
//! let client = NearClient::new("testnet")?;
//! let account = client.view_account("alice.testnet", None, None)?;
//! println!("{:?}", account.get(0, "amount"));
//! # Ok::<(), near_rpc_tables::NearError>(())
//! ```

pub mod calls;
pub mod normalize;
pub mod output;
pub mod rpc;
pub mod table;
pub mod utils;

pub use calls::{BlockId, BlockReference, EpochLocator, Finality, NearClient, TxExecutionStatus};
pub use rpc::{Endpoint, HttpTransport, Transport};
pub use table::{Cell, Column, ColumnType, Table};
pub use utils::config::{ClientConfig, RetryPolicy};
pub use utils::error::{ErrorKind, NearError};
