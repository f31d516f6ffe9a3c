pub mod batch;
pub mod catalog;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod escalation;
pub mod evaluator;
pub mod policy;

pub use batch::{evaluate_candidates, select_under_coverage, solve_batch, BatchOutcome, EvaluatedCandidate};
pub use catalog::{CatalogError, RuleCatalog, RuleCategory, RuleConfig, RuleDefinition, RuleId};
pub use domain::decision::{
    Decision, DecisionId, DecisionStateError, DecisionStatus, RuleViolation,
};
pub use domain::leave::{
    ApproverId, EmployeeId, EmployeeSnapshot, LeaveRequest, LeaveType, OrgId, RequestId,
};
pub use domain::team::{MemberLeave, TeamState};
pub use engine::LeaveEngine;
pub use errors::EngineError;
pub use escalation::{
    ChainResolutionError, ChainResolver, DecisionStore, EscalationConfig, EscalationEngine,
    EscalationError, EscalationEvent, EscalationReason, InMemoryChainResolver,
    InMemoryDecisionStore, StoreError,
};
pub use evaluator::{
    coverage_limits, ConstraintEvaluator, EvaluationContext, EvaluatorConfig, RuleOutcome,
};
pub use policy::{PolicyError, PolicyResolver, PolicySet, ResolvedRule, RuleOverride, RuleOverrides};
