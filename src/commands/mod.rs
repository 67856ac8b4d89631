//! Glue between parsed CLI arguments and the library.

use anyhow::{Context, Result};
use near_rpc_tables::output::{render_text, to_json, write_json};
use near_rpc_tables::{BlockId, EpochLocator, Finality, Table};
use serde_json::Value;
use std::path::Path;

/// How a result table is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Parse `--finality` / `--block-id`; conflicts are left to the library
pub fn parse_block_selector(
    finality: Option<&str>,
    block_id: Option<&str>,
) -> Result<(Option<Finality>, Option<BlockId>)> {
    let finality = finality.map(str::parse::<Finality>).transpose()?;
    let block_id = block_id.map(str::parse::<BlockId>).transpose()?;
    Ok((finality, block_id))
}

/// Parse the validators epoch selector
pub fn parse_epoch(block_id: Option<&str>, epoch_id: Option<&str>) -> Result<EpochLocator> {
    match (block_id, epoch_id) {
        (Some(_), Some(_)) => anyhow::bail!("use either --block-id or --epoch-id, not both"),
        (Some(block_id), None) => Ok(EpochLocator::Block(block_id.parse()?)),
        (None, Some(epoch_id)) => Ok(EpochLocator::EpochId(epoch_id.to_string())),
        (None, None) => Ok(EpochLocator::Latest),
    }
}

/// Parse `--args` as JSON
pub fn parse_args_json(args: Option<&str>) -> Result<Option<Value>> {
    args.map(|text| {
        serde_json::from_str(text).with_context(|| format!("--args is not valid JSON: {}", text))
    })
    .transpose()
}

/// Print a table, or write it to `output` as JSON
pub fn emit(table: &Table, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        write_json(table, path).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {} row(s) to {}", table.len(), path.display());
        return Ok(());
    }

    match format {
        OutputFormat::Text => print!("{}", render_text(table)),
        OutputFormat::Json => println!("{}", to_json(table, true)?),
    }
    Ok(())
}
