//! Core synchronization engine
//!
//! The SyncEngine drives the control loop:
//!
//! 1. Observe the cluster's current public addresses
//! 2. Fingerprint the snapshot and compare against the last applied one
//! 3. If changed, reconcile the zone and store the new fingerprint
//!
//! ```text
//! ┌───────────┐  snapshot   ┌────────────┐  delete/create  ┌──────────┐
//! │  NodeApi  │────────────▶│ SyncEngine │────────────────▶│ ZoneApi  │
//! └───────────┘             └────────────┘                 └──────────┘
//! ```
//!
//! ## Error Flow
//!
//! A failed observation or reconciliation abandons the cycle, leaves
//! the stored fingerprint untouched, and waits for the next tick. The
//! fixed interval is the only retry mechanism; there is no in-cycle
//! retry or backoff.

use tokio::sync::{mpsc, oneshot};
use tokio::time::Duration;
use tracing::{error, info, warn};

use crate::config::SyncConfig;
use crate::error::Result;
use crate::observer::observe;
use crate::reconcile::{ReconcileOutcome, reconcile};
use crate::traits::{NodeApi, ZoneApi};

/// Events emitted by the SyncEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Engine started
    Started {
        interval_secs: u64,
    },

    /// Observation failed; cycle skipped
    ObserveFailed {
        error: String,
    },

    /// Snapshot matches the last applied fingerprint; nothing to do
    SnapshotUnchanged {
        fingerprint: String,
    },

    /// Reconciliation succeeded and the fingerprint was stored
    ReconcileApplied {
        fingerprint: String,
        deleted: usize,
        created: usize,
    },

    /// Reconciliation failed; fingerprint untouched, retried next tick
    ReconcileFailed {
        error: String,
    },

    /// Engine stopped
    Stopped {
        reason: String,
    },
}

/// Outcome of one successful tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Snapshot unchanged since the last applied one; no zone calls made
    Unchanged,
    /// Zone reconciled against a new snapshot
    Applied(ReconcileOutcome),
}

/// The control loop
///
/// Owns the provider bindings and the last-applied fingerprint. There
/// is exactly one mutator of the fingerprint and one in-flight cycle at
/// a time, so no locking is involved.
///
/// ## Lifecycle
///
/// 1. Create with [`SyncEngine::new()`]
/// 2. Drive with [`SyncEngine::run()`], or call [`SyncEngine::tick()`]
///    directly (tests, one-shot invocations)
/// 3. The loop runs until a shutdown signal interrupts the inter-tick
///    sleep or an in-progress cycle's provider call
pub struct SyncEngine {
    /// Cluster observation binding
    node_api: Box<dyn NodeApi>,

    /// Zone record binding
    zone_api: Box<dyn ZoneApi>,

    /// Validated configuration
    config: SyncConfig,

    /// Fingerprint of the last successfully applied snapshot
    ///
    /// Empty sentinel until the first successful reconciliation, which
    /// guarantees the first cycle always reconciles regardless of the
    /// zone's actual content.
    last_applied: String,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl SyncEngine {
    /// Create a new engine
    ///
    /// Validates the configuration and returns the engine together with
    /// the receiving end of its event channel.
    pub fn new(
        node_api: Box<dyn NodeApi>,
        zone_api: Box<dyn ZoneApi>,
        config: SyncConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let engine = Self {
            node_api,
            zone_api,
            config,
            last_applied: String::new(),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Fingerprint of the last successfully applied snapshot
    ///
    /// Empty until the first successful reconciliation.
    pub fn last_applied(&self) -> &str {
        &self.last_applied
    }

    /// Run one observe → compare → reconcile cycle
    ///
    /// This is the scheduler-tick abstraction: [`SyncEngine::run()`]
    /// calls it once per interval, and tests call it directly. The
    /// stored fingerprint advances only when the whole cycle succeeds.
    pub async fn tick(&mut self) -> Result<TickOutcome> {
        let snapshot = match observe(
            self.node_api.as_ref(),
            self.config.cluster_id,
            self.config.pool_id,
        )
        .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.emit_event(EngineEvent::ObserveFailed {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        let fingerprint = snapshot.fingerprint();
        if fingerprint == self.last_applied {
            self.emit_event(EngineEvent::SnapshotUnchanged {
                fingerprint: fingerprint.clone(),
            });
            return Ok(TickOutcome::Unchanged);
        }

        info!(%fingerprint, "observed address change");

        match reconcile(self.zone_api.as_ref(), self.config.zone_id, &snapshot).await {
            Ok(outcome) => {
                self.last_applied = fingerprint.clone();
                self.emit_event(EngineEvent::ReconcileApplied {
                    fingerprint,
                    deleted: outcome.deleted,
                    created: outcome.created,
                });
                Ok(TickOutcome::Applied(outcome))
            }
            Err(e) => {
                self.emit_event(EngineEvent::ReconcileFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Run the control loop until ctrl-c
    pub async fn run(&mut self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Run the control loop with an explicit shutdown signal
    ///
    /// The signal promptly interrupts the inter-tick sleep and aborts
    /// an in-progress provider call; nothing needs rollback on
    /// cancellation, the loop resumes convergence from external state
    /// on the next start.
    pub async fn run_with_shutdown(
        &mut self,
        shutdown_rx: oneshot::Receiver<()>,
    ) -> Result<()> {
        self.run_internal(Some(shutdown_rx)).await
    }

    async fn run_internal(&mut self, shutdown_rx: Option<oneshot::Receiver<()>>) -> Result<()> {
        let interval = Duration::from_secs(self.config.interval_secs);
        self.emit_event(EngineEvent::Started {
            interval_secs: self.config.interval_secs,
        });
        info!(
            cluster_id = self.config.cluster_id,
            pool_id = self.config.pool_id,
            zone_id = self.config.zone_id,
            interval_secs = self.config.interval_secs,
            "sync engine started"
        );

        // The shutdown signal races the whole cycle, not just the sleep:
        // dropping the cycle future aborts an in-progress provider call,
        // and partial state needs no rollback (the next start converges
        // from external state).
        if let Some(mut rx) = shutdown_rx {
            loop {
                let shutdown = tokio::select! {
                    _ = &mut rx => true,
                    () = async {
                        tokio::time::sleep(interval).await;
                        self.logged_tick().await;
                    } => false,
                };
                if shutdown {
                    info!("Shutdown signal received");
                    self.emit_event(EngineEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    break;
                }
            }
        } else {
            loop {
                let shutdown = tokio::select! {
                    _ = tokio::signal::ctrl_c() => true,
                    () = async {
                        tokio::time::sleep(interval).await;
                        self.logged_tick().await;
                    } => false,
                };
                if shutdown {
                    info!("Shutdown signal received");
                    self.emit_event(EngineEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    break;
                }
            }
        }

        Ok(())
    }

    /// Run one tick, logging instead of propagating cycle failures
    ///
    /// Every provider error is recoverable once configuration is
    /// validated, so the loop never terminates on a failed cycle.
    async fn logged_tick(&mut self) {
        match self.tick().await {
            Ok(TickOutcome::Unchanged) => {
                info!(fingerprint = %self.last_applied, "no address change");
            }
            Ok(TickOutcome::Applied(outcome)) => {
                info!(
                    deleted = outcome.deleted,
                    created = outcome.created,
                    "reconciliation applied"
                );
            }
            Err(e) => {
                error!("Cycle failed, retrying next tick: {}", e);
            }
        }
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        if self.event_tx.try_send(event).is_err() {
            warn!("Event channel full, dropping event");
        }
    }
}
