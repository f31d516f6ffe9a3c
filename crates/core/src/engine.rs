use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::batch::{solve_batch, BatchOutcome};
use crate::catalog::RuleCatalog;
use crate::domain::decision::Decision;
use crate::domain::leave::{EmployeeId, EmployeeSnapshot, LeaveRequest, OrgId};
use crate::domain::team::TeamState;
use crate::errors::EngineError;
use crate::evaluator::{ConstraintEvaluator, EvaluationContext, EvaluatorConfig};
use crate::policy::{PolicyResolver, RuleOverrides};

/// Facade wiring the catalog, policy resolution, evaluation, and batch
/// selection together. Holds no I/O handles; callers supply snapshots and
/// persist the results.
#[derive(Clone, Debug)]
pub struct LeaveEngine {
    resolver: PolicyResolver,
    evaluator: ConstraintEvaluator,
}

impl LeaveEngine {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self {
            resolver: PolicyResolver::new(catalog),
            evaluator: ConstraintEvaluator::new(),
        }
    }

    pub fn with_evaluator_config(catalog: Arc<RuleCatalog>, config: EvaluatorConfig) -> Self {
        Self {
            resolver: PolicyResolver::new(catalog),
            evaluator: ConstraintEvaluator::with_config(config),
        }
    }

    pub fn evaluator(&self) -> &ConstraintEvaluator {
        &self.evaluator
    }

    pub fn resolver(&self) -> &PolicyResolver {
        &self.resolver
    }

    pub fn evaluate(
        &self,
        org_id: &OrgId,
        overrides: &RuleOverrides,
        request: &LeaveRequest,
        ctx: &EvaluationContext,
    ) -> Result<Decision, EngineError> {
        self.evaluate_at(org_id, overrides, request, ctx, Utc::now())
    }

    pub fn evaluate_at(
        &self,
        org_id: &OrgId,
        overrides: &RuleOverrides,
        request: &LeaveRequest,
        ctx: &EvaluationContext,
        now: DateTime<Utc>,
    ) -> Result<Decision, EngineError> {
        let policy = self.resolver.resolve(org_id, overrides)?;
        Ok(self.evaluator.evaluate_at(&policy, request, ctx, now))
    }

    pub fn solve_batch(
        &self,
        org_id: &OrgId,
        overrides: &RuleOverrides,
        requests: &[LeaveRequest],
        employees: &BTreeMap<EmployeeId, EmployeeSnapshot>,
        team: &TeamState,
    ) -> Result<BatchOutcome, EngineError> {
        self.solve_batch_at(org_id, overrides, requests, employees, team, Utc::now())
    }

    pub fn solve_batch_at(
        &self,
        org_id: &OrgId,
        overrides: &RuleOverrides,
        requests: &[LeaveRequest],
        employees: &BTreeMap<EmployeeId, EmployeeSnapshot>,
        team: &TeamState,
        now: DateTime<Utc>,
    ) -> Result<BatchOutcome, EngineError> {
        let policy = self.resolver.resolve(org_id, overrides)?;
        Ok(solve_batch(&self.evaluator, &policy, requests, employees, team, now))
    }
}
