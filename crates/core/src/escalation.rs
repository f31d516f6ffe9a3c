//! Escalation state machine for stale pending decisions.
//!
//! Advancement is deterministic and optimistic: the caller states which
//! level it read, and the store refuses the commit when another writer got
//! there first. A decision update and its escalation event always land
//! together or not at all.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::RuleId;
use crate::domain::decision::{Decision, DecisionId, DecisionStatus, RuleViolation};
use crate::domain::leave::{ApproverId, EmployeeId, OrgId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    SlaBreach,
}

/// Append-only record of one escalation hop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationEvent {
    pub event_id: String,
    pub decision_id: DecisionId,
    pub from_level: u8,
    pub to_level: u8,
    pub reason: EscalationReason,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChainResolutionError {
    #[error("approver lookup failed for {employee_id:?} at level {level}: {message}")]
    LookupFailed { employee_id: EmployeeId, level: u8, message: String },
}

/// Resolves the approver responsible at a given escalation level for an
/// employee: 0 is the direct manager, 1 the department head, 2 HR.
/// `Ok(None)` means the chain ends before that level.
pub trait ChainResolver: Send + Sync {
    fn next_approver(
        &self,
        employee_id: &EmployeeId,
        level: u8,
    ) -> Result<Option<ApproverId>, ChainResolutionError>;
}

#[derive(Clone, Default)]
pub struct InMemoryChainResolver {
    chains: Arc<Mutex<BTreeMap<EmployeeId, Vec<ApproverId>>>>,
}

impl InMemoryChainResolver {
    pub fn with_chain(self, employee_id: EmployeeId, approvers: Vec<ApproverId>) -> Self {
        match self.chains.lock() {
            Ok(mut chains) => {
                chains.insert(employee_id, approvers);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(employee_id, approvers);
            }
        }
        self
    }
}

impl ChainResolver for InMemoryChainResolver {
    fn next_approver(
        &self,
        employee_id: &EmployeeId,
        level: u8,
    ) -> Result<Option<ApproverId>, ChainResolutionError> {
        let chains = match self.chains.lock() {
            Ok(chains) => chains,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(chains.get(employee_id).and_then(|chain| chain.get(level as usize)).cloned())
    }
}

/// Escalation chain shape and per-level response windows.
#[derive(Clone, Debug)]
pub struct EscalationConfig {
    /// Level at which the chain is exhausted and humans take over.
    pub max_level: u8,
    /// Response window granted at each level past the first, in hours.
    /// Each window must be shorter than the previous one.
    pub level_sla_hours: Vec<i64>,
    /// Absolute floor for any escalated window.
    pub min_sla_hours: i64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self { max_level: 3, level_sla_hours: vec![12, 6, 3], min_sla_hours: 2 }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EscalationError {
    #[error("decision {0:?} is not pending escalation")]
    NotPending(DecisionId),
    #[error("decision {0:?} has not breached its deadline yet")]
    DeadlineNotReached(DecisionId),
    #[error("stale escalation level for {decision_id:?}: expected {expected}, found {actual}")]
    StaleLevel { decision_id: DecisionId, expected: u8, actual: u8 },
    #[error("escalation chain already exhausted for {0:?}")]
    ChainExhausted(DecisionId),
    #[error("no approver configured at level {level} for {decision_id:?}")]
    MissingApprover { decision_id: DecisionId, level: u8 },
    #[error(transparent)]
    Chain(#[from] ChainResolutionError),
}

#[derive(Clone, Debug, Default)]
pub struct EscalationEngine {
    config: EscalationConfig,
}

impl EscalationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EscalationConfig) -> Self {
        Self { config }
    }

    pub fn max_level(&self) -> u8 {
        self.config.max_level
    }

    /// Advance a breached decision one level up the approval chain.
    ///
    /// `expected_level` is the level the caller read before deciding to
    /// escalate; a mismatch means a concurrent writer advanced the decision
    /// first and this attempt must be dropped. Reaching the level cap parks
    /// the decision for manual intervention; a gap in the chain below the cap
    /// is an error and leaves the decision where it was.
    pub fn advance(
        &self,
        mut decision: Decision,
        expected_level: u8,
        now: DateTime<Utc>,
        resolver: &dyn ChainResolver,
    ) -> Result<(Decision, EscalationEvent), EscalationError> {
        if decision.status != DecisionStatus::PendingEscalation {
            return Err(EscalationError::NotPending(decision.id.clone()));
        }
        if decision.escalation_level != expected_level {
            return Err(EscalationError::StaleLevel {
                decision_id: decision.id.clone(),
                expected: expected_level,
                actual: decision.escalation_level,
            });
        }
        if now <= decision.sla_deadline {
            return Err(EscalationError::DeadlineNotReached(decision.id.clone()));
        }
        if decision.escalation_level >= self.config.max_level {
            return Err(EscalationError::ChainExhausted(decision.id.clone()));
        }

        let from_level = decision.escalation_level;
        let to_level = from_level + 1;
        if to_level >= self.config.max_level {
            // Chain genuinely exhausted. Park for manual intervention.
            decision.escalation_level = self.config.max_level;
            decision.current_approver = None;
            decision.note_violation(RuleViolation {
                rule_id: RuleId::new("ESCALATION"),
                message: "escalation chain exhausted, manual intervention required".to_string(),
                blocking: false,
            });
        } else {
            // A gap below the cap is a configuration problem, not exhaustion.
            // Leave the decision at its level so a later sweep can route it
            // once the chain is repaired.
            let approver = resolver
                .next_approver(&decision.employee_id, to_level)?
                .ok_or(EscalationError::MissingApprover {
                    decision_id: decision.id.clone(),
                    level: to_level,
                })?;
            decision.escalation_level = to_level;
            decision.current_approver = Some(approver);
            decision.sla_deadline = now + Duration::hours(self.window_hours(to_level));
        }

        let event = EscalationEvent {
            event_id: Uuid::new_v4().to_string(),
            decision_id: decision.id.clone(),
            from_level,
            to_level: decision.escalation_level,
            reason: EscalationReason::SlaBreach,
            occurred_at: now,
        };

        Ok((decision, event))
    }

    fn window_hours(&self, level: u8) -> i64 {
        self.config
            .level_sla_hours
            .get(level.saturating_sub(1) as usize)
            .copied()
            .unwrap_or(self.config.min_sla_hours)
            .max(self.config.min_sla_hours)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("decision not found: {0:?}")]
    NotFound(DecisionId),
    #[error("stale escalation level for {decision_id:?}: expected {expected}, found {actual}")]
    StaleLevel { decision_id: DecisionId, expected: u8, actual: u8 },
    #[error("decision store backend failure: {0}")]
    Backend(String),
}

/// Persistence seam for decisions and their escalation trail. `commit` must
/// write the decision and event atomically, refusing when the stored level
/// no longer matches `expected_level`.
pub trait DecisionStore: Send + Sync {
    fn insert(&self, decision: Decision) -> Result<(), StoreError>;

    fn get(&self, id: &DecisionId) -> Result<Option<Decision>, StoreError>;

    /// Pending decisions past their SLA deadline that still have an approver
    /// to answer for them, oldest deadline first.
    fn pending_past_deadline(
        &self,
        org_id: &OrgId,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Decision>, StoreError>;

    fn commit(
        &self,
        decision: Decision,
        event: EscalationEvent,
        expected_level: u8,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct StoreInner {
    decisions: BTreeMap<DecisionId, Decision>,
    events: Vec<EscalationEvent>,
}

#[derive(Clone, Default)]
pub struct InMemoryDecisionStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl InMemoryDecisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EscalationEvent> {
        self.lock_inner(|inner| inner.events.clone())
    }

    fn lock_inner<T>(&self, f: impl FnOnce(&mut StoreInner) -> T) -> T {
        match self.inner.lock() {
            Ok(mut inner) => f(&mut inner),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl DecisionStore for InMemoryDecisionStore {
    fn insert(&self, decision: Decision) -> Result<(), StoreError> {
        self.lock_inner(|inner| {
            inner.decisions.insert(decision.id.clone(), decision);
        });
        Ok(())
    }

    fn get(&self, id: &DecisionId) -> Result<Option<Decision>, StoreError> {
        Ok(self.lock_inner(|inner| inner.decisions.get(id).cloned()))
    }

    fn pending_past_deadline(
        &self,
        org_id: &OrgId,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Decision>, StoreError> {
        Ok(self.lock_inner(|inner| {
            let mut pending: Vec<Decision> = inner
                .decisions
                .values()
                .filter(|decision| {
                    decision.org_id == *org_id
                        && decision.status == DecisionStatus::PendingEscalation
                        && decision.sla_deadline < now
                        && decision.current_approver.is_some()
                })
                .cloned()
                .collect();
            pending.sort_by(|a, b| {
                a.sla_deadline.cmp(&b.sla_deadline).then_with(|| a.id.cmp(&b.id))
            });
            pending.truncate(limit);
            pending
        }))
    }

    fn commit(
        &self,
        decision: Decision,
        event: EscalationEvent,
        expected_level: u8,
    ) -> Result<(), StoreError> {
        self.lock_inner(|inner| {
            let stored = inner
                .decisions
                .get(&decision.id)
                .ok_or_else(|| StoreError::NotFound(decision.id.clone()))?;
            if stored.escalation_level != expected_level {
                return Err(StoreError::StaleLevel {
                    decision_id: decision.id.clone(),
                    expected: expected_level,
                    actual: stored.escalation_level,
                });
            }
            inner.decisions.insert(decision.id.clone(), decision);
            inner.events.push(event);
            Ok(())
        })
    }
}
