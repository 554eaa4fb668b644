//! Location registry: the village catalog and housing/workplace assignment.
//!
//! The [`LocationRegistry`] owns every [`Location`] in a village, keyed by
//! [`LocationId`]. It answers spatial queries (distance, nearest match) and
//! performs the two assignment operations the scheduler relies on:
//!
//! - [`assign_home`](LocationRegistry::assign_home) never overfills a home.
//!   When every home is full it registers a single-capacity emergency home
//!   next to the existing houses.
//! - [`assign_workplace`](LocationRegistry::assign_workplace) maps an
//!   occupation to the first location of the matching kind.
//!
//! Lookups on unknown identifiers return `None` (or `f64::INFINITY` for
//! distances) rather than errors.

use std::collections::BTreeMap;

use hamlet_types::{
    AgentId, Coordinate, Location, LocationCategory, LocationId, LocationKind, Occupation,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::error::WorldError;

/// Maximum offset, in map units, applied on each axis when placing an
/// emergency home.
const EMERGENCY_JITTER: f64 = 5.0;

/// Identifier prefix of synthesized homes.
const EMERGENCY_PREFIX: &str = "emergency-home";

/// The catalog of places in one village.
#[derive(Debug, Clone)]
pub struct LocationRegistry {
    /// All locations indexed by their identifier.
    locations: BTreeMap<LocationId, Location>,
    /// Source of jitter for emergency home placement.
    rng: StdRng,
    /// Number of emergency homes synthesized so far.
    emergency_homes: u32,
}

impl LocationRegistry {
    /// Create an empty registry. `seed` makes emergency home placement
    /// reproducible.
    pub fn new(seed: u64) -> Self {
        Self {
            locations: BTreeMap::new(),
            rng: StdRng::seed_from_u64(seed),
            emergency_homes: 0,
        }
    }

    /// Build a registry from a catalog, rejecting catalogs the simulation
    /// cannot run on.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateLocation`] if two entries share an id,
    /// [`WorldError::ZeroCapacityHome`] for a home with capacity 0,
    /// [`WorldError::NoHomes`] if no home exists, and
    /// [`WorldError::NoSafehaven`] if no safehaven exists.
    pub fn from_catalog(
        catalog: impl IntoIterator<Item = Location>,
        seed: u64,
    ) -> Result<Self, WorldError> {
        let mut registry = Self::new(seed);
        for location in catalog {
            if registry.locations.contains_key(&location.id) {
                return Err(WorldError::DuplicateLocation(location.id));
            }
            if location.category() == LocationCategory::Home && location.capacity == Some(0) {
                return Err(WorldError::ZeroCapacityHome(location.id));
            }
            registry.register(location);
        }
        if registry.by_category(LocationCategory::Home).is_empty() {
            return Err(WorldError::NoHomes);
        }
        if registry.safehaven().is_none() {
            return Err(WorldError::NoSafehaven);
        }
        Ok(registry)
    }

    // -------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------

    /// Insert a location, replacing any existing entry with the same id.
    /// Returns the replaced entry.
    pub fn register(&mut self, location: Location) -> Option<Location> {
        self.locations.insert(location.id.clone(), location)
    }

    /// Look up a location.
    pub fn find(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    /// Iterate over every location in id order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Number of registered locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// All locations of a category, in id order.
    pub fn by_category(&self, category: LocationCategory) -> Vec<&Location> {
        self.locations
            .values()
            .filter(|loc| loc.category() == category)
            .collect()
    }

    /// Homes that can take another resident.
    pub fn available_homes(&self) -> Vec<&Location> {
        self.locations
            .values()
            .filter(|loc| loc.category() == LocationCategory::Home && loc.has_vacancy())
            .collect()
    }

    /// The village safehaven, if one is registered.
    pub fn safehaven(&self) -> Option<&Location> {
        self.locations
            .values()
            .find(|loc| loc.category() == LocationCategory::Safehaven)
    }

    /// Number of emergency homes synthesized so far.
    pub const fn emergency_home_count(&self) -> u32 {
        self.emergency_homes
    }

    // -------------------------------------------------------------------
    // Spatial queries
    // -------------------------------------------------------------------

    /// Euclidean distance between two locations, or `f64::INFINITY` if
    /// either is unknown.
    pub fn distance(&self, a: &str, b: &str) -> f64 {
        match (self.find(a), self.find(b)) {
            (Some(from), Some(to)) => from.coordinate.distance_to(to.coordinate),
            _ => f64::INFINITY,
        }
    }

    /// The location closest to `origin` that satisfies `predicate`. Ties go
    /// to the lower id. Returns `None` if `origin` is unknown or nothing
    /// matches.
    pub fn nearest_where(
        &self,
        origin: &str,
        predicate: impl Fn(&Location) -> bool,
    ) -> Option<&Location> {
        let from = self.find(origin)?.coordinate;
        self.locations
            .values()
            .filter(|loc| predicate(loc))
            .map(|loc| (from.distance_to(loc.coordinate), loc))
            .fold(None, |best: Option<(f64, &Location)>, (dist, loc)| match best {
                Some((best_dist, _)) if best_dist <= dist => best,
                _ => Some((dist, loc)),
            })
            .map(|(_, loc)| loc)
    }

    // -------------------------------------------------------------------
    // Assignment
    // -------------------------------------------------------------------

    /// Assign `agent` a home and record them as a resident.
    ///
    /// Order of preference:
    ///
    /// 1. The preferred home, if the agent already lives there or it has a
    ///    vacancy.
    /// 2. The home the agent already lives in.
    /// 3. The first home with a vacancy.
    /// 4. A freshly registered single-capacity emergency home.
    ///
    /// The agent is listed in exactly one home afterwards: moving to a new
    /// home removes them from the old one.
    pub fn assign_home(&mut self, agent: &AgentId, preferred: Option<&LocationId>) -> LocationId {
        let current = self.current_home(agent);
        let chosen = preferred
            .and_then(|id| self.locations.get(id))
            .filter(|loc| {
                loc.category() == LocationCategory::Home
                    && (loc.residents.contains(agent) || loc.has_vacancy())
            })
            .map(|loc| loc.id.clone())
            .or_else(|| current.clone())
            .or_else(|| self.available_homes().first().map(|loc| loc.id.clone()));

        let home_id = match chosen {
            Some(id) => id,
            None => self.register_emergency_home(),
        };

        if let Some(old) = current.filter(|old| *old != home_id) {
            self.vacate(agent, &old);
        }
        if let Some(home) = self.locations.get_mut(&home_id)
            && home.residents.insert(agent.clone())
        {
            debug!(agent = %agent, home = %home_id, residents = home.residents.len(), "Home assigned");
        }
        home_id
    }

    /// The workplace for `occupation`: the first location whose kind matches
    /// the occupation's trade. `None` for unknown occupations and trades
    /// without a fixed workplace.
    pub fn assign_workplace(&self, agent: &AgentId, occupation: &str) -> Option<LocationId> {
        let kind = Occupation::parse(occupation)?.workplace_kind()?;
        let workplace = self.first_of_kind(kind).map(|loc| loc.id.clone());
        if workplace.is_none() {
            debug!(agent = %agent, occupation, ?kind, "No workplace of the required kind");
        }
        workplace
    }

    /// The first location (by id) of a given kind.
    pub fn first_of_kind(&self, kind: LocationKind) -> Option<&Location> {
        self.locations.values().find(|loc| loc.kind == kind)
    }

    /// The home that currently lists `agent` as a resident.
    fn current_home(&self, agent: &AgentId) -> Option<LocationId> {
        self.locations
            .values()
            .find(|loc| loc.category() == LocationCategory::Home && loc.residents.contains(agent))
            .map(|loc| loc.id.clone())
    }

    /// Remove `agent` from the residents of `home`.
    fn vacate(&mut self, agent: &AgentId, home: &LocationId) {
        if let Some(loc) = self.locations.get_mut(home)
            && loc.residents.remove(agent)
        {
            debug!(agent = %agent, home = %home, "Moved out");
        }
    }

    /// Register a single-capacity home near the existing houses.
    fn register_emergency_home(&mut self) -> LocationId {
        let anchor = self
            .by_category(LocationCategory::Home)
            .first()
            .map_or_else(Coordinate::default, |loc| loc.coordinate);
        let coordinate = Coordinate::new(
            anchor.x + self.rng.random_range(-EMERGENCY_JITTER..=EMERGENCY_JITTER),
            anchor.y + self.rng.random_range(-EMERGENCY_JITTER..=EMERGENCY_JITTER),
        );

        self.emergency_homes = self.emergency_homes.saturating_add(1);
        let id = LocationId::generate(EMERGENCY_PREFIX);
        let name = format!("Emergency Shelter {}", self.emergency_homes);
        warn!(home = %id, x = coordinate.x, y = coordinate.y, "All homes full, registering emergency home");

        self.register(Location::new(id.clone(), name, LocationKind::House, coordinate).with_capacity(1));
        id
    }
}
