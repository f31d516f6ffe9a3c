use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::RuleId;
use crate::domain::leave::{ApproverId, EmployeeId, LeaveType, OrgId, RequestId};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DecisionId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Approved,
    ApprovedWithEscalation,
    Rejected,
    PendingEscalation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule_id: RuleId,
    pub message: String,
    pub blocking: bool,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecisionStateError {
    #[error("invalid decision transition from {from:?} to {to:?}")]
    InvalidTransition { from: DecisionStatus, to: DecisionStatus },
}

/// Outcome of evaluating one leave request. Violations are append-only once
/// the initial evaluation is recorded; escalation may add notes but never
/// rewrites history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub id: DecisionId,
    pub org_id: OrgId,
    pub request_id: RequestId,
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub approved: bool,
    pub status: DecisionStatus,
    pub violations: Vec<RuleViolation>,
    pub checks_performed: u32,
    pub priority: Decimal,
    pub degraded: bool,
    pub suggested_retry_date: Option<NaiveDate>,
    pub submitted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub sla_deadline: DateTime<Utc>,
    pub escalation_level: u8,
    pub current_approver: Option<ApproverId>,
}

impl Decision {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, DecisionStatus::Approved | DecisionStatus::Rejected)
    }

    pub fn has_blocking_violation(&self) -> bool {
        self.violations.iter().any(|violation| violation.blocking)
    }

    /// Hand an escalation-flagged decision to its first approver. From here
    /// the decision sits in the pending queue until a human acts or the
    /// sweep advances it.
    pub fn queue_for_approval(&mut self, approver: ApproverId) -> Result<(), DecisionStateError> {
        if self.status != DecisionStatus::ApprovedWithEscalation {
            return Err(DecisionStateError::InvalidTransition {
                from: self.status,
                to: DecisionStatus::PendingEscalation,
            });
        }
        self.status = DecisionStatus::PendingEscalation;
        self.current_approver = Some(approver);
        Ok(())
    }

    /// Record a human verdict. Terminal either way; a rejected decision
    /// never re-enters the escalation queue.
    pub fn finalize(&mut self, approve: bool) -> Result<(), DecisionStateError> {
        let to = if approve { DecisionStatus::Approved } else { DecisionStatus::Rejected };
        if self.status != DecisionStatus::PendingEscalation
            && self.status != DecisionStatus::ApprovedWithEscalation
        {
            return Err(DecisionStateError::InvalidTransition { from: self.status, to });
        }
        self.status = to;
        self.approved = approve;
        self.current_approver = None;
        Ok(())
    }

    pub fn note_violation(&mut self, violation: RuleViolation) {
        self.violations.push(violation);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use super::{Decision, DecisionId, DecisionStateError, DecisionStatus};
    use crate::domain::leave::{ApproverId, EmployeeId, LeaveType, OrgId, RequestId};

    fn decision(status: DecisionStatus) -> Decision {
        let now = Utc::now();
        Decision {
            id: DecisionId("dec-001".to_string()),
            org_id: OrgId("org-001".to_string()),
            request_id: RequestId("REQ-001".to_string()),
            employee_id: EmployeeId("emp-001".to_string()),
            leave_type: LeaveType::Annual,
            start_date: NaiveDate::from_ymd_opt(2026, 5, 4).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2026, 5, 6).expect("valid date"),
            approved: false,
            status,
            violations: Vec::new(),
            checks_performed: 0,
            priority: Decimal::ONE,
            degraded: false,
            suggested_retry_date: None,
            submitted_at: now,
            created_at: now,
            sla_deadline: now,
            escalation_level: 0,
            current_approver: None,
        }
    }

    #[test]
    fn queue_requires_escalation_flag() {
        let mut clean = decision(DecisionStatus::Approved);
        let result = clean.queue_for_approval(ApproverId("mgr-001".to_string()));
        assert_eq!(
            result,
            Err(DecisionStateError::InvalidTransition {
                from: DecisionStatus::Approved,
                to: DecisionStatus::PendingEscalation,
            })
        );

        let mut flagged = decision(DecisionStatus::ApprovedWithEscalation);
        flagged.queue_for_approval(ApproverId("mgr-001".to_string())).expect("queue");
        assert_eq!(flagged.status, DecisionStatus::PendingEscalation);
        assert_eq!(flagged.current_approver, Some(ApproverId("mgr-001".to_string())));
    }

    #[test]
    fn finalize_is_terminal() {
        let mut pending = decision(DecisionStatus::PendingEscalation);
        pending.finalize(true).expect("finalize");
        assert_eq!(pending.status, DecisionStatus::Approved);
        assert!(pending.approved);
        assert!(pending.current_approver.is_none());
        assert!(pending.finalize(false).is_err());
    }
}
