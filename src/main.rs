//! near-tables CLI
//!
//! Runs one NEAR JSON-RPC call and prints the result as a table.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use near_rpc_tables::{BlockReference, ClientConfig, Endpoint, NearClient};
use std::path::PathBuf;
use std::time::Duration;

mod commands;

use commands::{emit, parse_args_json, parse_block_selector, parse_epoch, OutputFormat};

/// near-tables - NEAR JSON-RPC results as tables
#[derive(Parser, Debug)]
#[command(name = "near-tables")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// RPC endpoint: mainnet, testnet, archival, or an http(s) URL
    #[arg(short, long, global = true, env = "NEAR_RPC_ENDPOINT", default_value = "mainnet")]
    endpoint: String,

    /// Per-attempt timeout in seconds
    #[arg(long, global = true, env = "NEAR_RPC_TIMEOUT", default_value = "30")]
    timeout: u64,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the table as JSON to this file instead of printing it
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Account balance and storage
    Account {
        account_id: String,

        /// optimistic, near-final, or final
        #[arg(long)]
        finality: Option<String>,

        /// Block height or hash
        #[arg(long)]
        block_id: Option<String>,
    },

    /// Block header
    Block {
        /// Finality keyword, height, or hash (default: final)
        block: Option<String>,
    },

    /// Node and chain status
    Status,

    /// Broadcast a signed transaction
    SendTx {
        /// Base64-encoded signed transaction
        signed_tx_base64: String,

        /// NONE, INCLUDED, INCLUDED_FINAL, EXECUTED, or FINAL
        #[arg(long)]
        wait_until: Option<String>,
    },

    /// Transaction status
    Tx {
        tx_hash: String,

        sender_account_id: String,

        /// NONE, INCLUDED, INCLUDED_FINAL, EXECUTED, or FINAL
        #[arg(long, default_value = "FINAL")]
        wait_until: String,
    },

    /// Call a contract view method
    Call {
        account_id: String,

        method_name: String,

        /// JSON arguments (default: {})
        #[arg(long)]
        args: Option<String>,

        #[arg(long)]
        finality: Option<String>,

        #[arg(long)]
        block_id: Option<String>,
    },

    /// Access keys of an account
    Keys {
        account_id: String,

        #[arg(long)]
        finality: Option<String>,

        #[arg(long)]
        block_id: Option<String>,
    },

    /// Protocol configuration
    ProtocolConfig {
        #[arg(long)]
        finality: Option<String>,

        #[arg(long)]
        block_id: Option<String>,
    },

    /// Current validator set
    Validators {
        /// Any block inside the wanted epoch
        #[arg(long)]
        block_id: Option<String>,

        #[arg(long)]
        epoch_id: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let config = ClientConfig::new(Endpoint::parse(&cli.endpoint)?)
        .with_timeout(Duration::from_secs(cli.timeout));
    let client = NearClient::from_config(config)?;

    let table = match cli.command {
        Commands::Account {
            account_id,
            finality,
            block_id,
        } => {
            let (finality, block_id) =
                parse_block_selector(finality.as_deref(), block_id.as_deref())?;
            client.view_account(&account_id, finality, block_id)?
        }

        Commands::Block { block } => {
            let locator = block
                .as_deref()
                .map(str::parse::<BlockReference>)
                .transpose()?;
            client.block(locator)?
        }

        Commands::Status => client.status()?,

        Commands::SendTx {
            signed_tx_base64,
            wait_until,
        } => client.send_tx(&signed_tx_base64, wait_until.as_deref())?,

        Commands::Tx {
            tx_hash,
            sender_account_id,
            wait_until,
        } => client.tx_status(&tx_hash, &sender_account_id, &wait_until)?,

        Commands::Call {
            account_id,
            method_name,
            args,
            finality,
            block_id,
        } => {
            let args = parse_args_json(args.as_deref())?;
            let (finality, block_id) =
                parse_block_selector(finality.as_deref(), block_id.as_deref())?;
            client.call_function(&account_id, &method_name, args.as_ref(), finality, block_id)?
        }

        Commands::Keys {
            account_id,
            finality,
            block_id,
        } => {
            let (finality, block_id) =
                parse_block_selector(finality.as_deref(), block_id.as_deref())?;
            client.view_access_key_list(&account_id, finality, block_id)?
        }

        Commands::ProtocolConfig { finality, block_id } => {
            let (finality, block_id) =
                parse_block_selector(finality.as_deref(), block_id.as_deref())?;
            client.protocol_config(finality, block_id)?
        }

        Commands::Validators { block_id, epoch_id } => {
            let epoch = parse_epoch(block_id.as_deref(), epoch_id.as_deref())?;
            client.validators(epoch)?
        }
    };

    emit(&table, cli.format, cli.output.as_deref())
}
