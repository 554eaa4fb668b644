//! Places, housing, and workplaces for the Hamlet simulation.
//!
//! This crate models the physical village: a catalog of locations with
//! coordinates and capacities, and the assignment rules that give each
//! villager a home and (when their trade has one) a workplace.
//!
//! # Modules
//!
//! - [`error`] -- Error types for catalog validation.
//! - [`registry`] -- [`LocationRegistry`], the owned catalog with assignment
//!   and spatial queries.
//! - [`starting_village`] -- Default 18-location starting village.
//!
//! [`LocationRegistry`]: registry::LocationRegistry

pub mod error;
pub mod registry;
pub mod starting_village;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use registry::LocationRegistry;
pub use starting_village::{create_starting_village, starting_catalog};
