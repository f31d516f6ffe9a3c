//! Immutable rule catalog.
//!
//! The catalog is the canonical registry of constraint rules. It is built
//! once at startup, validated eagerly, and shared read-only for the life of
//! the process. Per-org variation happens in policy resolution, never here.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::leave::LeaveType;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleId(pub String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Limits,
    Balance,
    Coverage,
    Blackout,
    Notice,
    Calculation,
    Eligibility,
    Documentation,
    Escalation,
}

/// Typed configuration payload for a rule. Each kind belongs to exactly one
/// category; the catalog and policy resolver reject mismatched pairings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    DurationLimits { max_days: BTreeMap<LeaveType, u32> },
    BalanceCheck { fallback_allocation: BTreeMap<LeaveType, Decimal> },
    TeamCoverage { min_available: u32 },
    ConcurrentLeave { max_concurrent: u32 },
    Blackout { extra_dates: BTreeSet<NaiveDate>, exempt_types: BTreeSet<LeaveType> },
    Notice { min_notice_days: BTreeMap<LeaveType, u32> },
    ConsecutiveLimit { max_consecutive_days: BTreeMap<LeaveType, u32> },
    WorkingDaySpan,
    Eligibility { min_tenure_months: BTreeMap<LeaveType, u32> },
    Documentation { applies_to: LeaveType, certificate_after_days: u32 },
    BalanceReserve { min_remaining: Decimal },
    DateValidation,
    MonthlyQuota { max_days_per_month: Decimal },
    HalfDayReview,
}

impl RuleConfig {
    pub fn category(&self) -> RuleCategory {
        match self {
            Self::DurationLimits { .. } => RuleCategory::Limits,
            Self::BalanceCheck { .. } => RuleCategory::Balance,
            Self::TeamCoverage { .. } => RuleCategory::Coverage,
            Self::ConcurrentLeave { .. } => RuleCategory::Coverage,
            Self::Blackout { .. } => RuleCategory::Blackout,
            Self::Notice { .. } => RuleCategory::Notice,
            Self::ConsecutiveLimit { .. } => RuleCategory::Limits,
            Self::WorkingDaySpan => RuleCategory::Calculation,
            Self::Eligibility { .. } => RuleCategory::Eligibility,
            Self::Documentation { .. } => RuleCategory::Documentation,
            Self::BalanceReserve { .. } => RuleCategory::Balance,
            Self::DateValidation => RuleCategory::Calculation,
            Self::MonthlyQuota { .. } => RuleCategory::Limits,
            Self::HalfDayReview => RuleCategory::Escalation,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub id: RuleId,
    pub name: String,
    pub category: RuleCategory,
    pub priority: i32,
    pub blocking: bool,
    pub config: RuleConfig,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate rule id in catalog: {0:?}")]
    DuplicateRule(RuleId),
    #[error("rule {rule_id:?} declares category {declared:?} but its config belongs to {actual:?}")]
    CategoryMismatch { rule_id: RuleId, declared: RuleCategory, actual: RuleCategory },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCatalog {
    version: String,
    rules: BTreeMap<RuleId, RuleDefinition>,
}

impl RuleCatalog {
    pub fn new(
        version: impl Into<String>,
        rules: Vec<RuleDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut indexed = BTreeMap::new();
        for rule in rules {
            if rule.config.category() != rule.category {
                return Err(CatalogError::CategoryMismatch {
                    rule_id: rule.id.clone(),
                    declared: rule.category,
                    actual: rule.config.category(),
                });
            }
            if indexed.insert(rule.id.clone(), rule.clone()).is_some() {
                return Err(CatalogError::DuplicateRule(rule.id));
            }
        }
        Ok(Self { version: version.into(), rules: indexed })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn get(&self, id: &RuleId) -> Option<&RuleDefinition> {
        self.rules.get(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules ordered by descending priority, ascending id on ties.
    pub fn all(&self) -> Vec<&RuleDefinition> {
        let mut rules: Vec<&RuleDefinition> = self.rules.values().collect();
        rules.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));
        rules
    }

    /// The shipped default rule set.
    pub fn builtin() -> Self {
        let rules = vec![
            RuleDefinition {
                id: RuleId::new("RULE001"),
                name: "Maximum Leave Duration".to_string(),
                category: RuleCategory::Limits,
                priority: 70,
                blocking: true,
                config: RuleConfig::DurationLimits {
                    max_days: BTreeMap::from([
                        (LeaveType::Annual, 20),
                        (LeaveType::Sick, 15),
                        (LeaveType::Emergency, 5),
                        (LeaveType::Personal, 5),
                        (LeaveType::Maternity, 180),
                        (LeaveType::Paternity, 15),
                        (LeaveType::Bereavement, 5),
                        (LeaveType::Study, 10),
                    ]),
                },
            },
            RuleDefinition {
                id: RuleId::new("RULE002"),
                name: "Leave Balance Check".to_string(),
                category: RuleCategory::Balance,
                priority: 90,
                blocking: true,
                config: RuleConfig::BalanceCheck {
                    fallback_allocation: BTreeMap::from([
                        (LeaveType::Annual, Decimal::from(15)),
                        (LeaveType::Sick, Decimal::from(10)),
                        (LeaveType::Emergency, Decimal::from(3)),
                        (LeaveType::Personal, Decimal::from(5)),
                        (LeaveType::Maternity, Decimal::from(180)),
                        (LeaveType::Paternity, Decimal::from(14)),
                        (LeaveType::Bereavement, Decimal::from(5)),
                        (LeaveType::Study, Decimal::from(10)),
                    ]),
                },
            },
            RuleDefinition {
                id: RuleId::new("RULE003"),
                name: "Minimum Team Coverage".to_string(),
                category: RuleCategory::Coverage,
                priority: 100,
                blocking: true,
                config: RuleConfig::TeamCoverage { min_available: 3 },
            },
            RuleDefinition {
                id: RuleId::new("RULE004"),
                name: "Maximum Concurrent Leave".to_string(),
                category: RuleCategory::Coverage,
                priority: 95,
                blocking: true,
                config: RuleConfig::ConcurrentLeave { max_concurrent: 2 },
            },
            RuleDefinition {
                id: RuleId::new("RULE005"),
                name: "Blackout Period Check".to_string(),
                category: RuleCategory::Blackout,
                priority: 85,
                blocking: true,
                config: RuleConfig::Blackout {
                    extra_dates: BTreeSet::new(),
                    exempt_types: BTreeSet::from([LeaveType::Emergency, LeaveType::Bereavement]),
                },
            },
            RuleDefinition {
                id: RuleId::new("RULE006"),
                name: "Advance Notice Requirement".to_string(),
                category: RuleCategory::Notice,
                priority: 60,
                blocking: false,
                config: RuleConfig::Notice {
                    min_notice_days: BTreeMap::from([
                        (LeaveType::Annual, 7),
                        (LeaveType::Sick, 0),
                        (LeaveType::Emergency, 0),
                        (LeaveType::Personal, 3),
                        (LeaveType::Maternity, 30),
                        (LeaveType::Paternity, 14),
                        (LeaveType::Bereavement, 0),
                        (LeaveType::Study, 14),
                    ]),
                },
            },
            RuleDefinition {
                id: RuleId::new("RULE007"),
                name: "Consecutive Leave Limit".to_string(),
                category: RuleCategory::Limits,
                priority: 65,
                blocking: true,
                config: RuleConfig::ConsecutiveLimit {
                    max_consecutive_days: BTreeMap::from([
                        (LeaveType::Annual, 10),
                        (LeaveType::Sick, 5),
                        (LeaveType::Emergency, 3),
                        (LeaveType::Personal, 3),
                    ]),
                },
            },
            RuleDefinition {
                id: RuleId::new("RULE008"),
                name: "Working Day Span".to_string(),
                category: RuleCategory::Calculation,
                priority: 40,
                blocking: false,
                config: RuleConfig::WorkingDaySpan,
            },
            RuleDefinition {
                id: RuleId::new("RULE009"),
                name: "Probation Eligibility".to_string(),
                category: RuleCategory::Eligibility,
                priority: 75,
                blocking: true,
                config: RuleConfig::Eligibility {
                    min_tenure_months: BTreeMap::from([
                        (LeaveType::Annual, 3),
                        (LeaveType::Study, 6),
                    ]),
                },
            },
            RuleDefinition {
                id: RuleId::new("RULE010"),
                name: "Medical Documentation".to_string(),
                category: RuleCategory::Documentation,
                priority: 50,
                blocking: false,
                config: RuleConfig::Documentation {
                    applies_to: LeaveType::Sick,
                    certificate_after_days: 3,
                },
            },
            RuleDefinition {
                id: RuleId::new("RULE011"),
                name: "Balance Reserve Floor".to_string(),
                category: RuleCategory::Balance,
                priority: 55,
                blocking: false,
                config: RuleConfig::BalanceReserve { min_remaining: Decimal::ONE },
            },
            RuleDefinition {
                id: RuleId::new("RULE012"),
                name: "Date Order Validation".to_string(),
                category: RuleCategory::Calculation,
                priority: 99,
                blocking: true,
                config: RuleConfig::DateValidation,
            },
            RuleDefinition {
                id: RuleId::new("RULE013"),
                name: "Monthly Leave Quota".to_string(),
                category: RuleCategory::Limits,
                priority: 45,
                blocking: false,
                config: RuleConfig::MonthlyQuota { max_days_per_month: Decimal::from(5) },
            },
            RuleDefinition {
                id: RuleId::new("RULE014"),
                name: "Half-Day Review".to_string(),
                category: RuleCategory::Escalation,
                priority: 30,
                blocking: false,
                config: RuleConfig::HalfDayReview,
            },
        ];

        match Self::new("2026.1", rules) {
            Ok(catalog) => catalog,
            // The builtin table is fixed at compile time; a failure here is
            // a programming error caught by the tests below.
            Err(error) => unreachable!("builtin catalog must be valid: {error}"),
        }
    }
}
