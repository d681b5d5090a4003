//! Application context - the one object that owns the services
//!
//! Built once at startup and handed to whatever drives it (the runtime
//! worker for the TUI, or a CLI subcommand).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use super::{QueryService, StatusPoller};
use crate::config::Config;
use crate::infrastructure::rpc::{HttpRpcClient, RpcClient};
use crate::store::HistoryStore;

pub struct AppContext {
    pub rpc: Arc<dyn RpcClient>,
    pub query: QueryService,
    pub status: StatusPoller,
}

impl AppContext {
    pub fn new(rpc: Arc<dyn RpcClient>, history: HistoryStore, status_interval: Duration) -> Self {
        Self {
            query: QueryService::new(Arc::clone(&rpc), history),
            status: StatusPoller::new(Arc::clone(&rpc), status_interval),
            rpc,
        }
    }

    /// Wire the HTTP client from configuration
    pub fn from_config(config: &Config, history: HistoryStore) -> Result<Self> {
        let rpc: Arc<dyn RpcClient> =
            Arc::new(HttpRpcClient::new(&config.rpc, config.request_timeout())?);
        Ok(Self::new(rpc, history, config.status_interval()))
    }

    pub fn endpoint(&self) -> &str {
        self.rpc.endpoint()
    }
}
