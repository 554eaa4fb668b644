//! Default starting village for the Hamlet simulation.
//!
//! Six houses clustered around a square, one workplace for every trade
//! that has one, three social venues, and the keep on the hill as the
//! safehaven. Coordinates are in map units; the renderer scales them.

use hamlet_types::{Coordinate, Location, LocationKind};

use crate::error::WorldError;
use crate::registry::LocationRegistry;

/// Helper to build a capacitated house.
fn house(id: &str, name: &str, capacity: u32, x: f64, y: f64) -> Location {
    Location::new(id, name, LocationKind::House, Coordinate::new(x, y)).with_capacity(capacity)
}

/// Helper to build an uncapacitated venue.
fn venue(id: &str, name: &str, kind: LocationKind, x: f64, y: f64) -> Location {
    Location::new(id, name, kind, Coordinate::new(x, y))
}

/// The default village catalog.
pub fn starting_catalog() -> Vec<Location> {
    vec![
        // --- Homes ---
        house("house-miller", "Miller Cottage", 3, 40.0, 40.0),
        house("house-oak", "Oak House", 2, 48.0, 38.0),
        house("house-river", "River House", 4, 36.0, 52.0),
        house("house-hill", "Hill Cottage", 2, 56.0, 46.0),
        house("house-stone", "Stone House", 3, 44.0, 58.0),
        house("house-ash", "Ash Cottage", 2, 60.0, 56.0),
        // --- Workplaces ---
        venue("farm", "North Fields", LocationKind::Farm, 50.0, 10.0),
        venue("bakery", "Bakery", LocationKind::Bakery, 46.0, 46.0),
        venue("forge", "Forge", LocationKind::Forge, 62.0, 40.0),
        venue("workshop", "Carpenter's Workshop", LocationKind::Workshop, 34.0, 44.0),
        venue("mine", "Old Mine", LocationKind::Mine, 85.0, 20.0),
        venue("lumber-camp", "Lumber Camp", LocationKind::LumberCamp, 15.0, 25.0),
        venue("herb-garden", "Herb Garden", LocationKind::HerbGarden, 30.0, 60.0),
        // --- Social ---
        venue("market", "Market", LocationKind::Market, 52.0, 50.0),
        venue("tavern", "The Crooked Kettle", LocationKind::Tavern, 54.0, 54.0),
        venue("square", "Village Square", LocationKind::Square, 50.0, 48.0),
        venue("chapel", "Chapel", LocationKind::Chapel, 42.0, 30.0),
        // --- Safehaven ---
        venue("keep", "The Keep", LocationKind::Keep, 70.0, 75.0),
    ]
}

/// Build a validated registry holding the default village.
///
/// # Errors
///
/// Returns [`WorldError`] if the built-in catalog fails validation.
pub fn create_starting_village(seed: u64) -> Result<LocationRegistry, WorldError> {
    LocationRegistry::from_catalog(starting_catalog(), seed)
}
