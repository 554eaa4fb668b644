//! Error types for the `hamlet-world` crate.
//!
//! Registry lookups never fail; these errors only arise when validating a
//! village catalog at startup.

use hamlet_types::LocationId;

/// Errors that can occur while building a validated location registry.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The catalog has no safehaven for villagers to flee to.
    #[error("village catalog has no safehaven")]
    NoSafehaven,

    /// The catalog has no homes at all.
    #[error("village catalog has no homes")]
    NoHomes,

    /// A home was declared with room for nobody.
    #[error("home {0} has zero capacity")]
    ZeroCapacityHome(LocationId),

    /// The same identifier appears twice in the catalog.
    #[error("duplicate location id: {0}")]
    DuplicateLocation(LocationId),
}
