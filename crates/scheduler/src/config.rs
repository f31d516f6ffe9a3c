use std::env;

use thiserror::Error;

/// Sweep cadence and per-run limits. Environment variables override the
/// defaults; precedence is defaults, then `COVERLY_SWEEP_*`.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Seconds between sweep runs for an org.
    pub sweep_interval_seconds: u64,
    /// Wall-clock budget for one run, in milliseconds. A run past its budget
    /// commits what it has and reports truncation.
    pub run_budget_ms: u64,
    /// Upper bound on decisions considered per run.
    pub max_decisions_per_run: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { sweep_interval_seconds: 300, run_budget_ms: 5_000, max_decisions_per_run: 500 }
    }
}

#[derive(Debug, Error)]
pub enum SchedulerConfigError {
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("scheduler configuration validation failed: {0}")]
    Validation(String),
}

impl SchedulerConfig {
    pub fn load() -> Result<Self, SchedulerConfigError> {
        let mut config = Self::default();

        if let Some(value) = read_env("COVERLY_SWEEP_INTERVAL_SECONDS") {
            config.sweep_interval_seconds = parse_u64("COVERLY_SWEEP_INTERVAL_SECONDS", &value)?;
        }
        if let Some(value) = read_env("COVERLY_SWEEP_BUDGET_MS") {
            config.run_budget_ms = parse_u64("COVERLY_SWEEP_BUDGET_MS", &value)?;
        }
        if let Some(value) = read_env("COVERLY_SWEEP_MAX_DECISIONS") {
            config.max_decisions_per_run =
                parse_u64("COVERLY_SWEEP_MAX_DECISIONS", &value)? as usize;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SchedulerConfigError> {
        if self.sweep_interval_seconds == 0 {
            return Err(SchedulerConfigError::Validation(
                "sweep_interval_seconds must be greater than zero".to_string(),
            ));
        }
        if self.run_budget_ms == 0 {
            return Err(SchedulerConfigError::Validation(
                "run_budget_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_decisions_per_run == 0 {
            return Err(SchedulerConfigError::Validation(
                "max_decisions_per_run must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, SchedulerConfigError> {
    value.parse::<u64>().map_err(|_| SchedulerConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}
