//! JSON Export
//!
//! Serializable views of query results, chain status and history.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{BalanceQueryResult, ChainStatus, HistoryEntry};

/// Exportable query result; wei is a decimal string so no precision is lost
#[derive(Debug, Serialize)]
pub struct ExportableResult<'a> {
    address: &'a str,
    balance: f64,
    balance_wei: String,
    latency_ms: u64,
    timestamp: DateTime<Utc>,
}

impl<'a> From<&'a BalanceQueryResult> for ExportableResult<'a> {
    fn from(result: &'a BalanceQueryResult) -> Self {
        Self {
            address: result.address.as_str(),
            balance: result.balance_decimal,
            balance_wei: result.balance_wei.to_string(),
            latency_ms: result.latency_ms,
            timestamp: result.queried_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportableStatus {
    block_height: u64,
    connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

impl From<&ChainStatus> for ExportableStatus {
    fn from(status: &ChainStatus) -> Self {
        Self {
            block_height: status.block_height,
            connected: status.connected,
            latency_ms: status.latency_ms,
        }
    }
}

pub fn write_value<W: Write, T: Serialize>(mut out: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// History in the same shape it is persisted in
pub fn write_history<W: Write>(out: W, entries: &[HistoryEntry]) -> Result<usize> {
    write_value(out, &entries)?;
    Ok(entries.len())
}
