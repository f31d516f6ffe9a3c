//! Parallel stage-one evaluation for batch solving.
//!
//! Individual evaluations are independent, so they fan out over a JoinSet.
//! Results are re-ordered by submission index before the sequential
//! selection stage, keeping output identical to the sequential path.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use coverly_core::batch::{select_under_coverage, BatchOutcome, EvaluatedCandidate};
use coverly_core::domain::leave::{EmployeeId, EmployeeSnapshot, LeaveRequest};
use coverly_core::domain::team::TeamState;
use coverly_core::evaluator::{ConstraintEvaluator, EvaluationContext};
use coverly_core::policy::PolicySet;
use tokio::task::JoinSet;
use tracing::error;

pub async fn evaluate_candidates_parallel(
    evaluator: Arc<ConstraintEvaluator>,
    policy: Arc<PolicySet>,
    requests: Vec<LeaveRequest>,
    employees: Arc<BTreeMap<EmployeeId, EmployeeSnapshot>>,
    team: Arc<TeamState>,
    now: DateTime<Utc>,
) -> Vec<EvaluatedCandidate> {
    let mut tasks = JoinSet::new();
    for (index, request) in requests.into_iter().enumerate() {
        let evaluator = evaluator.clone();
        let policy = policy.clone();
        let employees = employees.clone();
        let team = team.clone();
        tasks.spawn(async move {
            let ctx = EvaluationContext {
                employee: employees.get(&request.employee_id).cloned(),
                team: Some((*team).clone()),
            };
            let decision = evaluator.evaluate_at(&policy, &request, &ctx, now);
            (index, EvaluatedCandidate { request, decision })
        });
    }

    let mut indexed = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(pair) => indexed.push(pair),
            // Evaluation is pure and non-panicking; a join failure here
            // means the task was cancelled out from under us.
            Err(join_error) => error!(error = %join_error, "candidate evaluation task failed"),
        }
    }
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, candidate)| candidate).collect()
}

/// Both batch stages with the evaluation fan-out, selection staying
/// sequential under a single owner.
pub async fn solve_batch_parallel(
    evaluator: Arc<ConstraintEvaluator>,
    policy: Arc<PolicySet>,
    requests: Vec<LeaveRequest>,
    employees: Arc<BTreeMap<EmployeeId, EmployeeSnapshot>>,
    team: Arc<TeamState>,
    now: DateTime<Utc>,
) -> BatchOutcome {
    let candidates = evaluate_candidates_parallel(
        evaluator,
        policy.clone(),
        requests,
        employees,
        team.clone(),
        now,
    )
    .await;
    select_under_coverage(&policy, candidates, &team)
}
