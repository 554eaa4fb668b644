//! Shared type definitions for the Hamlet village simulation.
//!
//! This crate is the single source of truth for the records exchanged
//! between the simulation crates and the outside world. Types flow
//! downstream to `TypeScript` via `ts-rs` for the rendering front end.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string wrappers for agent, location, and storage IDs
//! - [`enums`] -- Closed enumerations (location kinds, activities, occupations,
//!   resources, checkpoints, threats)
//! - [`structs`] -- Core records (locations, agents, needs, production tasks)

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    Activity, Checkpoint, LocationCategory, LocationKind, Occupation, ResourceCategory,
    ResourceKind, ThreatSeverity,
};
pub use ids::{AgentId, LocationId, StorageId};
pub use structs::{
    Agent, AgentProfile, Coordinate, Location, NEED_MAX, Needs, ProductionTask,
};
