//! Game clock, daily scheduler, and hour loop for the Hamlet simulation.
//!
//! This crate ties the location registry, the need/decision engine, and
//! the resource economy together behind a single [`Village`] that
//! advances one in-game hour at a time.
//!
//! # Modules
//!
//! - [`clock`] -- Day and hour counter with checkpoint detection.
//! - [`config`] -- Configuration loading from `hamlet-config.yaml` into
//!   strongly-typed structs.
//! - [`operator`] -- Shared pause/stop/speed state and queued commands.
//! - [`runner`] -- The async hour loop with run bounds.
//! - [`scheduler`] -- Checkpoint processing: decay, safety scan,
//!   decisions, movement.
//! - [`snapshot`] -- Serializable read-only view of the whole village.
//! - [`village`] -- The per-hour cycle across scheduler and economy.
//!
//! [`Village`]: village::Village

pub mod clock;
pub mod config;
pub mod operator;
pub mod runner;
pub mod scheduler;
pub mod snapshot;
pub mod village;

pub use clock::{ClockError, GameClock, HOURS_PER_DAY};
pub use config::{ConfigError, SimulationConfig};
pub use operator::{OperatorCommand, OperatorState, OperatorStatus, SimulationEndReason};
pub use runner::{HourCallback, NoOpCallback, RunResult, RunnerError, run_village};
pub use scheduler::{AgentMove, CheckpointReport, DailyScheduler};
pub use snapshot::WorldSnapshot;
pub use village::{HourSummary, Village, VillageError};
