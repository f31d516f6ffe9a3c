//! Coverage-aware selection across a batch of competing leave requests.
//!
//! Stage one evaluates every request on its own merits. Stage two admits
//! the survivors against a per-date coverage ledger: greedy in descending
//! priority order, then a single local-improvement sweep that swaps out
//! admissions whose combined weighted value is lower than a deferred
//! candidate's. Feasibility is the invariant; optimality is best-effort.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::decision::{Decision, DecisionStatus};
use crate::domain::leave::{EmployeeId, EmployeeSnapshot, LeaveRequest, RequestId};
use crate::domain::team::TeamState;
use crate::evaluator::{coverage_limits, ConstraintEvaluator, EvaluationContext};
use crate::policy::PolicySet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluatedCandidate {
    pub request: LeaveRequest,
    pub decision: Decision,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOutcome {
    pub approved: Vec<RequestId>,
    pub rejected: Vec<RequestId>,
    pub deferred: Vec<RequestId>,
    pub decisions: Vec<Decision>,
}

/// Stage one: evaluate each request individually against the same team
/// snapshot. Peer requests in the batch are not visible here; the ledger in
/// stage two arbitrates between them.
pub fn evaluate_candidates(
    evaluator: &ConstraintEvaluator,
    policy: &PolicySet,
    requests: &[LeaveRequest],
    employees: &BTreeMap<EmployeeId, EmployeeSnapshot>,
    team: &TeamState,
    now: DateTime<Utc>,
) -> Vec<EvaluatedCandidate> {
    requests
        .iter()
        .map(|request| {
            let ctx = EvaluationContext {
                employee: employees.get(&request.employee_id).cloned(),
                team: Some(team.clone()),
            };
            let decision = evaluator.evaluate_at(policy, request, &ctx, now);
            EvaluatedCandidate { request: request.clone(), decision }
        })
        .collect()
}

/// Stage two: admit individually-viable candidates without ever dropping a
/// date below minimum coverage, and at most one approval per employee.
pub fn select_under_coverage(
    policy: &PolicySet,
    candidates: Vec<EvaluatedCandidate>,
    team: &TeamState,
) -> BatchOutcome {
    let (min_coverage, max_concurrent) = coverage_limits(policy, team);
    let mut ledger = CoverageLedger::new(team, min_coverage, max_concurrent);

    let mut rejected = Vec::new();
    let mut viable: Vec<EvaluatedCandidate> = Vec::new();
    let mut decisions = Vec::new();

    for candidate in candidates {
        if candidate.decision.status == DecisionStatus::Rejected {
            rejected.push(candidate.request.request_id.clone());
            decisions.push(candidate.decision);
        } else {
            viable.push(candidate);
        }
    }

    viable.sort_by(|a, b| {
        b.decision
            .priority
            .cmp(&a.decision.priority)
            .then_with(|| a.request.submitted_at.cmp(&b.request.submitted_at))
            .then_with(|| a.request.request_id.cmp(&b.request.request_id))
    });

    let mut admitted: Vec<EvaluatedCandidate> = Vec::new();
    let mut deferred: Vec<EvaluatedCandidate> = Vec::new();
    let mut admitted_employees: BTreeSet<EmployeeId> = BTreeSet::new();

    for candidate in viable {
        let employee_free = !admitted_employees.contains(&candidate.request.employee_id);
        if employee_free && ledger.fits(&candidate.request) {
            ledger.admit(&candidate.request);
            admitted_employees.insert(candidate.request.employee_id.clone());
            admitted.push(candidate);
        } else {
            deferred.push(candidate);
        }
    }

    // One local-improvement sweep: a deferred candidate may displace the
    // admitted entries blocking it when their combined value is strictly
    // lower than its own.
    let mut still_deferred: Vec<EvaluatedCandidate> = Vec::new();
    for candidate in deferred {
        let conflicting: Vec<usize> = admitted
            .iter()
            .enumerate()
            .filter(|(_, other)| conflicts(&candidate.request, &other.request))
            .map(|(index, _)| index)
            .collect();

        let displaced_value: Decimal =
            conflicting.iter().map(|index| candidate_value(&admitted[*index])).sum();

        if displaced_value >= candidate_value(&candidate) {
            still_deferred.push(candidate);
            continue;
        }

        for index in &conflicting {
            ledger.release(&admitted[*index].request);
        }

        if ledger.fits(&candidate.request) {
            debug!(
                request_id = %candidate.request.request_id.0,
                displaced = conflicting.len(),
                "swap admitted higher value candidate"
            );
            // Remove in reverse index order so positions stay valid.
            for index in conflicting.iter().rev() {
                let removed = admitted.remove(*index);
                admitted_employees.remove(&removed.request.employee_id);
                still_deferred.push(removed);
            }
            ledger.admit(&candidate.request);
            admitted_employees.insert(candidate.request.employee_id.clone());
            admitted.push(candidate);
        } else {
            for index in &conflicting {
                ledger.admit(&admitted[*index].request);
            }
            still_deferred.push(candidate);
        }
    }

    let mut approved_ids = Vec::new();
    let mut deferred_ids = Vec::new();
    for candidate in admitted {
        approved_ids.push(candidate.request.request_id.clone());
        decisions.push(candidate.decision);
    }
    for candidate in still_deferred {
        deferred_ids.push(candidate.request.request_id.clone());
        decisions.push(candidate.decision);
    }

    approved_ids.sort();
    deferred_ids.sort();
    rejected.sort();

    BatchOutcome { approved: approved_ids, rejected, deferred: deferred_ids, decisions }
}

/// Convenience wrapper running both stages sequentially.
pub fn solve_batch(
    evaluator: &ConstraintEvaluator,
    policy: &PolicySet,
    requests: &[LeaveRequest],
    employees: &BTreeMap<EmployeeId, EmployeeSnapshot>,
    team: &TeamState,
    now: DateTime<Utc>,
) -> BatchOutcome {
    let candidates = evaluate_candidates(evaluator, policy, requests, employees, team, now);
    select_under_coverage(policy, candidates, team)
}

/// Priority-weighted value: rule priority of the decision times the working
/// days requested. Longer high-priority absences outweigh short ones, which
/// is what makes the swap sweep worthwhile.
fn candidate_value(candidate: &EvaluatedCandidate) -> Decimal {
    candidate.decision.priority * Decimal::from(candidate.request.business_days().max(1))
}

fn conflicts(a: &LeaveRequest, b: &LeaveRequest) -> bool {
    if a.employee_id == b.employee_id {
        return true;
    }
    a.start_date <= b.end_date && b.start_date <= a.end_date
}

struct CoverageLedger<'a> {
    team: &'a TeamState,
    min_coverage: u32,
    max_concurrent: u32,
    admitted_on: BTreeMap<NaiveDate, u32>,
}

impl<'a> CoverageLedger<'a> {
    fn new(team: &'a TeamState, min_coverage: u32, max_concurrent: u32) -> Self {
        Self { team, min_coverage, max_concurrent, admitted_on: BTreeMap::new() }
    }

    fn fits(&self, request: &LeaveRequest) -> bool {
        request.dates().into_iter().all(|date| {
            let absent =
                self.team.on_leave_count(date) + self.admitted_on.get(&date).copied().unwrap_or(0);
            let available_after = self.team.team_size.saturating_sub(absent + 1);
            available_after >= self.min_coverage && absent + 1 <= self.max_concurrent
        })
    }

    fn admit(&mut self, request: &LeaveRequest) {
        for date in request.dates() {
            *self.admitted_on.entry(date).or_insert(0) += 1;
        }
    }

    fn release(&mut self, request: &LeaveRequest) {
        for date in request.dates() {
            if let Some(count) = self.admitted_on.get_mut(&date) {
                *count = count.saturating_sub(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Arc;

    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::solve_batch;
    use crate::catalog::RuleCatalog;
    use crate::domain::leave::{
        EmployeeId, EmployeeSnapshot, LeaveRequest, LeaveType, OrgId, RequestId,
    };
    use crate::domain::team::TeamState;
    use crate::evaluator::ConstraintEvaluator;
    use crate::policy::{PolicyResolver, PolicySet, RuleOverrides};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).single().expect("valid timestamp")
    }

    fn policy() -> PolicySet {
        PolicyResolver::new(Arc::new(RuleCatalog::builtin()))
            .resolve(&OrgId("org-001".to_string()), &RuleOverrides::new())
            .expect("resolve")
    }

    fn snapshot(id: &str) -> EmployeeSnapshot {
        EmployeeSnapshot {
            employee_id: EmployeeId(id.to_string()),
            balances: BTreeMap::from([
                (LeaveType::Annual, Decimal::from(15)),
                (LeaveType::Sick, Decimal::from(10)),
            ]),
            tenure_months: 24,
            days_taken_this_month: Decimal::ZERO,
        }
    }

    fn team(size: u32, min_coverage: u32) -> TeamState {
        TeamState {
            team_size: size,
            members_on_leave: Vec::new(),
            min_coverage_required: Some(min_coverage),
            max_concurrent_leave: Some(2),
            blackout_dates: BTreeSet::new(),
        }
    }

    fn request(
        id: &str,
        employee: &str,
        leave_type: LeaveType,
        start: NaiveDate,
        end: NaiveDate,
        submitted_offset_hours: i64,
    ) -> LeaveRequest {
        LeaveRequest {
            request_id: RequestId(id.to_string()),
            employee_id: EmployeeId(employee.to_string()),
            leave_type,
            start_date: start,
            end_date: end,
            is_half_day: false,
            reason_text: None,
            submitted_at: now() + Duration::hours(submitted_offset_hours),
        }
    }

    fn employees(ids: &[&str]) -> BTreeMap<EmployeeId, EmployeeSnapshot> {
        ids.iter().map(|id| (EmployeeId(id.to_string()), snapshot(id))).collect()
    }

    #[test]
    fn overlapping_requests_defer_to_protect_coverage() {
        // Four staff, minimum three available, so at most one person may be
        // out on any date. Three overlapping requests: exactly one survives.
        let team = team(4, 3);
        let requests = vec![
            request("REQ-A", "emp-001", LeaveType::Annual, date(2026, 6, 15), date(2026, 6, 17), 0),
            request("REQ-B", "emp-002", LeaveType::Annual, date(2026, 6, 16), date(2026, 6, 18), 1),
            request("REQ-C", "emp-003", LeaveType::Annual, date(2026, 6, 17), date(2026, 6, 19), 2),
        ];

        let outcome = solve_batch(
            &ConstraintEvaluator::new(),
            &policy(),
            &requests,
            &employees(&["emp-001", "emp-002", "emp-003"]),
            &team,
            now(),
        );

        assert_eq!(outcome.approved.len(), 1);
        assert!(outcome.rejected.is_empty());
        assert_eq!(outcome.deferred.len(), 2);
        assert_eq!(outcome.decisions.len(), 3);
    }

    #[test]
    fn coverage_invariant_holds_on_every_date() {
        let team = team(6, 3);
        let requests = vec![
            request("REQ-A", "emp-001", LeaveType::Annual, date(2026, 6, 15), date(2026, 6, 19), 0),
            request("REQ-B", "emp-002", LeaveType::Annual, date(2026, 6, 15), date(2026, 6, 19), 1),
            request("REQ-C", "emp-003", LeaveType::Annual, date(2026, 6, 17), date(2026, 6, 19), 2),
            request("REQ-D", "emp-004", LeaveType::Annual, date(2026, 6, 18), date(2026, 6, 19), 3),
        ];

        let outcome = solve_batch(
            &ConstraintEvaluator::new(),
            &policy(),
            &requests,
            &employees(&["emp-001", "emp-002", "emp-003", "emp-004"]),
            &team,
            now(),
        );

        let approved: Vec<&LeaveRequest> = requests
            .iter()
            .filter(|request| outcome.approved.contains(&request.request_id))
            .collect();

        let mut cursor = date(2026, 6, 15);
        while cursor <= date(2026, 6, 19) {
            let out = approved
                .iter()
                .filter(|request| request.start_date <= cursor && cursor <= request.end_date)
                .count() as u32;
            assert!(team.team_size - out >= 3, "coverage broken on {cursor}");
            assert!(out <= 2, "concurrency broken on {cursor}");
            cursor += Duration::days(1);
        }
    }

    #[test]
    fn at_most_one_approval_per_employee() {
        let team = team(8, 3);
        let requests = vec![
            request("REQ-A", "emp-001", LeaveType::Annual, date(2026, 6, 15), date(2026, 6, 16), 0),
            request("REQ-B", "emp-001", LeaveType::Annual, date(2026, 6, 22), date(2026, 6, 23), 1),
        ];

        let outcome = solve_batch(
            &ConstraintEvaluator::new(),
            &policy(),
            &requests,
            &employees(&["emp-001"]),
            &team,
            now(),
        );

        assert_eq!(outcome.approved.len(), 1);
        assert_eq!(outcome.deferred.len(), 1);
    }

    #[test]
    fn ties_break_by_earlier_submission() {
        // Identical requests from two employees; only one slot on the date.
        let team = team(4, 3);
        let requests = vec![
            request("REQ-B", "emp-002", LeaveType::Annual, date(2026, 6, 15), date(2026, 6, 15), 5),
            request("REQ-A", "emp-001", LeaveType::Annual, date(2026, 6, 15), date(2026, 6, 15), 1),
        ];

        let outcome = solve_batch(
            &ConstraintEvaluator::new(),
            &policy(),
            &requests,
            &employees(&["emp-001", "emp-002"]),
            &team,
            now(),
        );

        assert_eq!(outcome.approved, vec![RequestId("REQ-A".to_string())]);
        assert_eq!(outcome.deferred, vec![RequestId("REQ-B".to_string())]);
    }

    #[test]
    fn swap_sweep_prefers_higher_total_value() {
        // One slot per date. The short clean request admits first on raw
        // greedy order (equal priority, earlier submission), but the longer
        // request carries more weighted value and displaces it.
        let team = team(4, 3);
        let requests = vec![
            request("REQ-SHORT", "emp-001", LeaveType::Annual, date(2026, 6, 15), date(2026, 6, 15), 0),
            request("REQ-LONG", "emp-002", LeaveType::Annual, date(2026, 6, 15), date(2026, 6, 19), 1),
        ];

        let outcome = solve_batch(
            &ConstraintEvaluator::new(),
            &policy(),
            &requests,
            &employees(&["emp-001", "emp-002"]),
            &team,
            now(),
        );

        assert_eq!(outcome.approved, vec![RequestId("REQ-LONG".to_string())]);
        assert_eq!(outcome.deferred, vec![RequestId("REQ-SHORT".to_string())]);
    }

    #[test]
    fn individually_rejected_requests_never_reach_selection() {
        let team = team(5, 3);
        // 26 calendar days exceeds both annual balance and duration caps.
        let requests = vec![
            request("REQ-BAD", "emp-001", LeaveType::Annual, date(2026, 7, 6), date(2026, 7, 31), 0),
            request("REQ-OK", "emp-002", LeaveType::Annual, date(2026, 6, 15), date(2026, 6, 16), 1),
        ];

        let outcome = solve_batch(
            &ConstraintEvaluator::new(),
            &policy(),
            &requests,
            &employees(&["emp-001", "emp-002"]),
            &team,
            now(),
        );

        assert_eq!(outcome.rejected, vec![RequestId("REQ-BAD".to_string())]);
        assert_eq!(outcome.approved, vec![RequestId("REQ-OK".to_string())]);
        assert!(outcome.deferred.is_empty());
    }
}
