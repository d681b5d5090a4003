//! Async worker - owns the application context and multiplexes commands,
//! status ticks and in-flight RPC calls on one task

use std::sync::mpsc::Sender;

use anyhow::Result;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::core::{AppContext, QueryError, StatusProbe};
use crate::domain::BalanceQueryResult;
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};

/// A finished network call, ready to be folded into the context
enum Completed {
    Balance {
        address: String,
        outcome: Result<BalanceQueryResult, QueryError>,
    },
    Status(StatusProbe),
}

/// Run the async worker loop until `Shutdown` or the command channel closes
pub async fn run_async_worker(
    mut ctx: AppContext,
    mut cmd_rx: UnboundedReceiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    info!(endpoint = ctx.endpoint(), "worker started");
    let _ = evt_tx.send(RuntimeEvent::HistoryChanged(
        ctx.query.history().entries().to_vec(),
    ));

    let mut pending: FuturesUnordered<BoxFuture<'static, Completed>> = FuturesUnordered::new();

    // First tick fires immediately: that is the startup refresh
    let mut status_timer = interval(ctx.status.interval());
    status_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    debug!("command channel closed");
                    return Ok(());
                };
                match cmd {
                    RuntimeCommand::Shutdown => {
                        info!(in_flight = pending.len(), "worker shutting down");
                        return Ok(());
                    }
                    RuntimeCommand::QueryBalance { address } => {
                        match ctx.query.prepare(&address) {
                            Ok(lookup) => pending.push(
                                async move {
                                    Completed::Balance {
                                        address,
                                        outcome: lookup.run().await,
                                    }
                                }
                                .boxed(),
                            ),
                            Err(err) => {
                                let _ = evt_tx.send(RuntimeEvent::QueryFailed {
                                    address,
                                    message: err.to_string(),
                                });
                            }
                        }
                    }
                    RuntimeCommand::RefreshStatus => {
                        pending.push(ctx.status.probe().map(Completed::Status).boxed());
                    }
                    RuntimeCommand::ClearHistory => {
                        if let Err(err) = ctx.query.history_mut().clear() {
                            warn!(error = %format!("{:#}", err), "history clear failed");
                            let _ = evt_tx.send(RuntimeEvent::Warning {
                                message: format!("{:#}", err),
                            });
                        }
                        let _ = evt_tx.send(RuntimeEvent::HistoryChanged(Vec::new()));
                    }
                }
            }

            _ = status_timer.tick() => {
                // Overlapping refreshes are allowed; each result is applied on arrival
                pending.push(ctx.status.probe().map(Completed::Status).boxed());
            }

            Some(done) = pending.next(), if !pending.is_empty() => {
                apply_completed(&mut ctx, done, &evt_tx);
            }
        }
    }
}

fn apply_completed(ctx: &mut AppContext, done: Completed, evt_tx: &Sender<RuntimeEvent>) {
    match done {
        Completed::Balance {
            outcome: Ok(result),
            ..
        } => {
            if let Err(err) = ctx.query.record(&result) {
                warn!(error = %format!("{:#}", err), "history not saved");
                let _ = evt_tx.send(RuntimeEvent::Warning {
                    message: format!("History not saved: {:#}", err),
                });
            }
            let _ = evt_tx.send(RuntimeEvent::QueryCompleted(result));
            let _ = evt_tx.send(RuntimeEvent::HistoryChanged(
                ctx.query.history().entries().to_vec(),
            ));
        }
        Completed::Balance {
            address,
            outcome: Err(err),
        } => {
            let _ = evt_tx.send(RuntimeEvent::QueryFailed {
                address,
                message: err.to_string(),
            });
        }
        Completed::Status(probe) => {
            let status = ctx.status.apply(probe);
            let _ = evt_tx.send(RuntimeEvent::StatusChanged(status));
        }
    }
}
