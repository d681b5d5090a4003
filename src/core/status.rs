//! Chain height and connectivity polling

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::domain::ChainStatus;
use crate::infrastructure::rpc::{RpcClient, RpcError};

/// Raw outcome of one `eth_blockNumber` round trip
#[derive(Debug, Clone)]
pub struct StatusProbe {
    pub height: Result<u64, RpcError>,
    pub latency_ms: u64,
}

pub struct StatusPoller {
    rpc: Arc<dyn RpcClient>,
    interval: Duration,
    status: ChainStatus,
}

impl StatusPoller {
    pub fn new(rpc: Arc<dyn RpcClient>, interval: Duration) -> Self {
        Self {
            rpc,
            interval,
            status: ChainStatus::default(),
        }
    }

    /// How often the worker schedules a refresh
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Last applied status
    pub fn status(&self) -> ChainStatus {
        self.status
    }

    /// The network half of a refresh. Owns what it needs, so several probes
    /// may be outstanding at once.
    pub fn probe(&self) -> impl Future<Output = StatusProbe> + Send + 'static {
        let rpc = Arc::clone(&self.rpc);
        async move {
            let started = Instant::now();
            let height = rpc.block_number().await;
            StatusProbe {
                height,
                latency_ms: started.elapsed().as_millis() as u64,
            }
        }
    }

    /// Fold a probe into the current status. A failed probe keeps the last
    /// known height and marks the chain disconnected.
    pub fn apply(&mut self, probe: StatusProbe) -> ChainStatus {
        match probe.height {
            Ok(height) => {
                debug!(height, latency_ms = probe.latency_ms, "chain status");
                self.status = ChainStatus {
                    block_height: height,
                    connected: true,
                    latency_ms: Some(probe.latency_ms),
                };
            }
            Err(err) => {
                warn!(error = %err, "chain status refresh failed");
                self.status.connected = false;
                self.status.latency_ms = None;
            }
        }
        self.status
    }

    /// Probe and apply in one go. Never fails; errors show up as
    /// `connected == false`.
    pub async fn refresh_status(&mut self) -> ChainStatus {
        let probe = self.probe().await;
        self.apply(probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::StubRpc;
    use serde_json::json;

    fn poller(stub: &Arc<StubRpc>) -> StatusPoller {
        let rpc: Arc<dyn RpcClient> = stub.clone();
        StatusPoller::new(rpc, Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_refresh_success() {
        let stub = Arc::new(StubRpc::new());
        stub.push(Ok(json!("0x1b4")));
        let mut poller = poller(&stub);

        let status = poller.refresh_status().await;

        assert_eq!(status.block_height, 436);
        assert!(status.connected);
        assert!(status.latency_ms.is_some());
        assert_eq!(stub.calls(), vec![("eth_blockNumber".to_string(), vec![])]);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_height() {
        let stub = Arc::new(StubRpc::new());
        stub.push(Ok(json!("0x10")));
        stub.push(Err(RpcError::Network {
            status: None,
            message: "connection refused".into(),
        }));
        stub.push(Err(RpcError::protocol("internal error")));
        stub.push(Ok(json!("0x11")));
        let mut poller = poller(&stub);

        assert_eq!(poller.refresh_status().await.block_height, 16);

        let status = poller.refresh_status().await;
        assert_eq!(status.block_height, 16);
        assert!(!status.connected);
        assert_eq!(status.latency_ms, None);

        let status = poller.refresh_status().await;
        assert_eq!(status.block_height, 16);
        assert!(!status.connected);

        let status = poller.refresh_status().await;
        assert_eq!(status.block_height, 17);
        assert!(status.connected);
    }

    #[tokio::test]
    async fn test_unparseable_height_is_disconnected() {
        let stub = Arc::new(StubRpc::new());
        stub.push(Ok(json!(null)));
        let mut poller = poller(&stub);

        let status = poller.refresh_status().await;
        assert_eq!(status, ChainStatus::default());
    }

    #[tokio::test]
    async fn test_overlapping_probes_apply_in_completion_order() {
        let stub = Arc::new(StubRpc::new());
        stub.push(Ok(json!("0x5")));
        stub.push(Ok(json!("0x6")));
        let mut poller = poller(&stub);

        let (first, second) = tokio::join!(poller.probe(), poller.probe());
        poller.apply(second);
        let status = poller.apply(first);

        assert!(status.connected);
        assert_eq!(stub.calls().len(), 2);
    }
}
