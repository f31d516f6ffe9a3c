pub mod batch;
pub mod config;
pub mod sweep;
pub mod telemetry;

pub use batch::{evaluate_candidates_parallel, solve_batch_parallel};
pub use config::{SchedulerConfig, SchedulerConfigError};
pub use sweep::{EscalationScheduler, SweepError, SweepItemError, SweepReport};
pub use telemetry::init_tracing;
