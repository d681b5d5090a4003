//! Balance query service
//!
//! A query is three steps: `prepare` validates the input, `BalanceLookup::run`
//! performs the single `eth_getBalance` call, `record` writes the history.
//! `query_balance` runs all three in order. The worker uses the steps
//! separately so overlapping lookups can be in flight while the history is
//! only ever touched from one place.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use super::QueryError;
use crate::domain::{wei_to_tara, Address, BalanceQueryResult};
use crate::infrastructure::rpc::RpcClient;
use crate::store::HistoryStore;

pub struct QueryService {
    rpc: Arc<dyn RpcClient>,
    history: HistoryStore,
}

/// A validated query waiting for its network call
pub struct BalanceLookup {
    rpc: Arc<dyn RpcClient>,
    address: Address,
}

impl QueryService {
    pub fn new(rpc: Arc<dyn RpcClient>, history: HistoryStore) -> Self {
        Self { rpc, history }
    }

    /// Validate `input`; no network traffic happens here
    pub fn prepare(&self, input: &str) -> Result<BalanceLookup, QueryError> {
        let address = Address::parse(input).ok_or_else(|| QueryError::Validation {
            input: input.to_string(),
        })?;
        Ok(BalanceLookup {
            rpc: Arc::clone(&self.rpc),
            address,
        })
    }

    /// Upsert the history with a successful result
    pub fn record(&mut self, result: &BalanceQueryResult) -> Result<()> {
        self.history.upsert(result.history_entry())
    }

    pub async fn query_balance(&mut self, input: &str) -> Result<BalanceQueryResult, QueryError> {
        let result = self.prepare(input)?.run().await?;
        if let Err(err) = self.record(&result) {
            warn!(error = %format!("{:#}", err), "query succeeded but history was not saved");
        }
        Ok(result)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }
}

impl BalanceLookup {
    pub fn address(&self) -> &Address {
        &self.address
    }

    pub async fn run(self) -> Result<BalanceQueryResult, QueryError> {
        let started = Instant::now();
        let outcome = self.rpc.get_balance(&self.address).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(balance_wei) => {
                let balance_decimal = wei_to_tara(balance_wei);
                info!(address = %self.address, balance = balance_decimal, latency_ms, "balance query");
                Ok(BalanceQueryResult {
                    address: self.address,
                    balance_wei,
                    balance_decimal,
                    latency_ms,
                    queried_at: Utc::now(),
                })
            }
            Err(err) => {
                warn!(address = %self.address, latency_ms, error = %err, "balance query failed");
                Err(err.into())
            }
        }
    }
}
