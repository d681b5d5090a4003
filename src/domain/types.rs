//! Query results, history entries and chain status

use alloy_primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Address;

/// Outcome of one successful `eth_getBalance` query
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceQueryResult {
    pub address: Address,
    pub balance_wei: U256,
    /// balance_wei / 10^18
    pub balance_decimal: f64,
    /// Wall-clock time around the RPC call
    pub latency_ms: u64,
    pub queried_at: DateTime<Utc>,
}

impl BalanceQueryResult {
    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            address: self.address.as_str().to_string(),
            balance_decimal: self.balance_decimal,
            queried_at: self.queried_at,
        }
    }
}

/// A persisted history record.
///
/// The address stays a plain string: entries are deduplicated on the literal
/// text and old persisted data is not re-validated on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub address: String,
    #[serde(rename = "balance")]
    pub balance_decimal: f64,
    #[serde(rename = "timestamp")]
    pub queried_at: DateTime<Utc>,
}

/// Latest known chain height and connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainStatus {
    pub block_height: u64,
    pub connected: bool,
    /// Round trip of the refresh that produced this status
    pub latency_ms: Option<u64>,
}
