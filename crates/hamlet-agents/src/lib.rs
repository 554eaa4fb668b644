//! Villager behaviour for the Hamlet simulation.
//!
//! Each villager carries five needs (food, safety, wealth, social, rest)
//! that decay at every checkpoint and recover hour by hour according to
//! what the villager is doing. At each checkpoint the decision engine
//! reads those needs and picks a destination and an activity.
//!
//! # Modules
//!
//! - [`config`] -- [`NeedsConfig`]: decay magnitudes and decision thresholds.
//! - [`needs`] -- Decay, recovery, and threat effects on a need vector.
//! - [`decision`] -- The ordered decision rules.
//! - [`agent`] -- Building a villager from a registration profile.
//!
//! [`NeedsConfig`]: config::NeedsConfig

pub mod agent;
pub mod config;
pub mod decision;
pub mod needs;

pub use agent::create_agent;
pub use config::NeedsConfig;
pub use decision::{Decision, DecisionReason, decide};
pub use needs::{
    NeedsDelta, apply_decay, apply_recovery, apply_threat, is_critical, recovery_delta,
    restore_safety,
};
