use thiserror::Error;

use crate::catalog::CatalogError;
use crate::domain::decision::DecisionStateError;
use crate::escalation::{ChainResolutionError, EscalationError, StoreError};
use crate::policy::PolicyError;

/// Top-level error taxonomy for callers embedding the engine.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    DecisionState(#[from] DecisionStateError),
    #[error(transparent)]
    Escalation(#[from] EscalationError),
    #[error(transparent)]
    Chain(#[from] ChainResolutionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// True when retrying with the same inputs cannot succeed and an
    /// operator has to fix configuration first.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Catalog(_) | Self::Policy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::EngineError;
    use crate::catalog::{CatalogError, RuleId};
    use crate::domain::decision::DecisionId;
    use crate::escalation::EscalationError;

    #[test]
    fn configuration_errors_are_flagged_as_such() {
        let config = EngineError::from(CatalogError::DuplicateRule(RuleId::new("RULE001")));
        assert!(config.is_configuration());

        let runtime = EngineError::from(EscalationError::DeadlineNotReached(DecisionId(
            "dec-001".to_string(),
        )));
        assert!(!runtime.is_configuration());
    }
}
