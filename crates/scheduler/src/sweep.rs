//! Periodic escalation sweep.
//!
//! One run per org at a time: a second caller fails fast instead of queuing.
//! Each decision is advanced and committed individually, so a failure or a
//! lost optimistic race affects only that decision. Shutdown and the run
//! budget are checked between decisions, never between a decision and its
//! event; the store commits those atomically.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use coverly_core::domain::decision::DecisionId;
use coverly_core::domain::leave::OrgId;
use coverly_core::escalation::{
    ChainResolver, DecisionStore, EscalationEngine, EscalationError, StoreError,
};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::SchedulerConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepItemError {
    pub decision_id: DecisionId,
    pub message: String,
}

/// Summary of one sweep run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepReport {
    pub org_id: OrgId,
    pub breached: usize,
    pub escalated: usize,
    pub errors: Vec<SweepItemError>,
    pub truncated: bool,
}

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("an escalation sweep is already running for org {0:?}")]
    RunInProgress(OrgId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct EscalationScheduler {
    config: SchedulerConfig,
    engine: EscalationEngine,
    store: Arc<dyn DecisionStore>,
    resolver: Arc<dyn ChainResolver>,
    locks: StdMutex<HashMap<OrgId, Arc<tokio::sync::Mutex<()>>>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl EscalationScheduler {
    pub fn new(
        config: SchedulerConfig,
        engine: EscalationEngine,
        store: Arc<dyn DecisionStore>,
        resolver: Arc<dyn ChainResolver>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config,
            engine,
            store,
            resolver,
            locks: StdMutex::new(HashMap::new()),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Ask running sweeps and loops to stop after their current decision.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    fn org_lock(&self, org_id: &OrgId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(locks) => locks,
            Err(poisoned) => poisoned.into_inner(),
        };
        locks.entry(org_id.clone()).or_default().clone()
    }

    /// Sweep one org once: advance every breached pending decision one level
    /// and commit each advancement together with its event.
    pub async fn run_once(
        &self,
        org_id: &OrgId,
        now: DateTime<Utc>,
    ) -> Result<SweepReport, SweepError> {
        let lock = self.org_lock(org_id);
        let _guard =
            lock.try_lock().map_err(|_| SweepError::RunInProgress(org_id.clone()))?;

        let started = Instant::now();
        let budget = Duration::from_millis(self.config.run_budget_ms);

        let mut pending = self.store.pending_past_deadline(
            org_id,
            now,
            self.config.max_decisions_per_run + 1,
        )?;
        let mut truncated = pending.len() > self.config.max_decisions_per_run;
        pending.truncate(self.config.max_decisions_per_run);
        let breached = pending.len();

        let mut escalated = 0usize;
        let mut errors = Vec::new();

        for decision in pending {
            if *self.shutdown_rx.borrow() {
                info!(org_id = %org_id.0, "shutdown requested, stopping sweep early");
                truncated = true;
                break;
            }
            if started.elapsed() >= budget {
                warn!(org_id = %org_id.0, "sweep budget exhausted, stopping early");
                truncated = true;
                break;
            }

            let decision_id = decision.id.clone();
            let expected_level = decision.escalation_level;
            match self.engine.advance(decision, expected_level, now, self.resolver.as_ref()) {
                Ok((advanced, event)) => {
                    match self.store.commit(advanced, event, expected_level) {
                        Ok(()) => escalated += 1,
                        Err(StoreError::StaleLevel { .. }) => {
                            // Another writer advanced this decision first.
                            debug!(decision_id = %decision_id.0, "lost escalation race, skipping");
                        }
                        Err(error) => {
                            warn!(
                                decision_id = %decision_id.0,
                                error = %error,
                                "failed to commit escalation"
                            );
                            errors.push(SweepItemError {
                                decision_id,
                                message: error.to_string(),
                            });
                        }
                    }
                }
                Err(
                    error @ (EscalationError::StaleLevel { .. }
                    | EscalationError::DeadlineNotReached(_)),
                ) => {
                    debug!(decision_id = %decision_id.0, error = %error, "skipping decision");
                }
                Err(error) => {
                    warn!(
                        decision_id = %decision_id.0,
                        error = %error,
                        "failed to advance decision"
                    );
                    errors.push(SweepItemError { decision_id, message: error.to_string() });
                }
            }
        }

        info!(
            org_id = %org_id.0,
            breached,
            escalated,
            error_count = errors.len(),
            truncated,
            "escalation sweep finished"
        );

        Ok(SweepReport { org_id: org_id.clone(), breached, escalated, errors, truncated })
    }

    /// Drive sweeps for one org on a fixed cadence until shutdown.
    pub async fn run(&self, org_id: OrgId) {
        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.sweep_interval_seconds));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut shutdown = self.shutdown_rx.clone();

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(error) = self.run_once(&org_id, Utc::now()).await {
                        warn!(org_id = %org_id.0, error = %error, "escalation sweep failed");
                    }
                }
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!(org_id = %org_id.0, "escalation loop stopped");
                        break;
                    }
                }
            }
        }
    }
}
