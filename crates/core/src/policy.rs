use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::catalog::{RuleCatalog, RuleCategory, RuleConfig, RuleId};
use crate::domain::leave::OrgId;

/// Per-org adjustment to one catalog rule. Absent fields keep the catalog
/// default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOverride {
    pub is_active: Option<bool>,
    pub config: Option<RuleConfig>,
}

pub type RuleOverrides = BTreeMap<RuleId, RuleOverride>;

/// One catalog rule with org overrides applied. Inactive rules stay in the
/// set so evaluation can skip them without re-consulting the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRule {
    pub id: RuleId,
    pub name: String,
    pub category: RuleCategory,
    pub priority: i32,
    pub blocking: bool,
    pub active: bool,
    pub config: RuleConfig,
}

/// Ordered, per-org view of the catalog: priority descending, rule id
/// ascending on ties. Every catalog rule appears exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySet {
    pub org_id: OrgId,
    pub catalog_version: String,
    rules: Vec<ResolvedRule>,
}

impl PolicySet {
    pub fn rules(&self) -> &[ResolvedRule] {
        &self.rules
    }

    pub fn active_rules(&self) -> impl Iterator<Item = &ResolvedRule> {
        self.rules.iter().filter(|rule| rule.active)
    }

    pub fn get(&self, id: &RuleId) -> Option<&ResolvedRule> {
        self.rules.iter().find(|rule| &rule.id == id)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error(
        "override for rule {rule_id:?} carries a {found:?} config but the rule is {expected:?}"
    )]
    ConfigMismatch { rule_id: RuleId, expected: RuleCategory, found: RuleCategory },
}

/// Merges org overrides onto the shared catalog. Stateless apart from the
/// catalog handle; resolve on every request rather than caching, so admin
/// changes take effect immediately.
#[derive(Clone, Debug)]
pub struct PolicyResolver {
    catalog: Arc<RuleCatalog>,
}

impl PolicyResolver {
    pub fn new(catalog: Arc<RuleCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn resolve(
        &self,
        org_id: &OrgId,
        overrides: &RuleOverrides,
    ) -> Result<PolicySet, PolicyError> {
        for rule_id in overrides.keys() {
            if self.catalog.get(rule_id).is_none() {
                warn!(
                    org_id = %org_id.0,
                    rule_id = %rule_id.0,
                    "ignoring override for unknown rule"
                );
            }
        }

        let mut rules = Vec::with_capacity(self.catalog.len());
        for definition in self.catalog.all() {
            let mut resolved = ResolvedRule {
                id: definition.id.clone(),
                name: definition.name.clone(),
                category: definition.category,
                priority: definition.priority,
                blocking: definition.blocking,
                active: true,
                config: definition.config.clone(),
            };

            if let Some(patch) = overrides.get(&definition.id) {
                if let Some(is_active) = patch.is_active {
                    resolved.active = is_active;
                }
                if let Some(config) = &patch.config {
                    if config.category() != definition.category {
                        return Err(PolicyError::ConfigMismatch {
                            rule_id: definition.id.clone(),
                            expected: definition.category,
                            found: config.category(),
                        });
                    }
                    resolved.config = config.clone();
                }
            }

            rules.push(resolved);
        }

        rules.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));

        Ok(PolicySet {
            org_id: org_id.clone(),
            catalog_version: self.catalog.version().to_string(),
            rules,
        })
    }
}
