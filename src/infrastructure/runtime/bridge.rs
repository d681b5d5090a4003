//! Runtime bridge - connects the sync TUI thread with the async worker
//!
//! The worker owns the `AppContext` on its own Tokio runtime thread. The TUI
//! sends `RuntimeCommand`s and drains `RuntimeEvent`s once per frame.

use std::sync::mpsc::{self, Receiver};
use std::thread;

use anyhow::{Context, Result};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::core::AppContext;
use crate::domain::{BalanceQueryResult, ChainStatus, HistoryEntry};
use crate::infrastructure::runtime::worker::run_async_worker;

/// Requests from the TUI thread
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeCommand {
    /// Run a balance query for the raw input
    QueryBalance { address: String },
    /// Refresh chain status now, outside the interval
    RefreshStatus,
    /// Forget all history
    ClearHistory,
    /// Stop the worker
    Shutdown,
}

/// Outcomes reported back to the TUI thread
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    QueryCompleted(BalanceQueryResult),
    QueryFailed { address: String, message: String },
    StatusChanged(ChainStatus),
    /// Full history list after any change (and once at startup)
    HistoryChanged(Vec<HistoryEntry>),
    /// Non-fatal problem worth telling the user about
    Warning { message: String },
}

/// Handle the TUI keeps on the worker thread
pub struct RuntimeBridge {
    cmd_tx: UnboundedSender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Start the worker thread with its own single-threaded runtime
    pub fn new(ctx: AppContext) -> Result<Self> {
        let (cmd_tx, cmd_rx) = unbounded_channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to create Tokio runtime")?;

        thread::Builder::new()
            .name("taraq-rpc".into())
            .spawn(move || {
                rt.block_on(async {
                    if let Err(err) = run_async_worker(ctx, cmd_rx, evt_tx.clone()).await {
                        let _ = evt_tx.send(RuntimeEvent::Warning {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })
            .context("Failed to spawn worker thread")?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Queue a command; fails only once the worker is gone
    pub fn send(&self, cmd: RuntimeCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("RPC worker is not running"))
    }

    /// Everything the worker reported since the last call, without blocking
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
