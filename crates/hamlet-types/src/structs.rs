//! Core entity structs for the Hamlet simulation.
//!
//! These are plain data records shared by every crate and read by external
//! observers (renderer, persistence). Behavior lives in the crates that own
//! each record: the world crate mutates [`Location`] residents, the agents
//! crate mutates [`Needs`], the economy crate owns [`ProductionTask`]s.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Activity, LocationCategory, LocationKind, Occupation, ResourceKind};
use crate::ids::{AgentId, LocationId, StorageId};

/// Upper bound of every need scalar.
pub const NEED_MAX: u32 = 100;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point on the village map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinate {
    /// East-west position.
    pub x: f64,
    /// North-south position.
    pub y: f64,
}

impl Coordinate {
    /// Create a coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another coordinate.
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// A place in the village catalog.
///
/// `capacity` bounds the number of residents of a home; other locations
/// are normally uncapacitated. `residents` is only populated for homes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// Catalog identifier.
    pub id: LocationId,
    /// Display name.
    pub name: String,
    /// Concrete kind; determines the category.
    pub kind: LocationKind,
    /// Position on the map.
    pub coordinate: Coordinate,
    /// Maximum number of residents, if bounded.
    pub capacity: Option<u32>,
    /// Villagers who live here.
    pub residents: BTreeSet<AgentId>,
}

impl Location {
    /// Create an uncapacitated location with no residents.
    pub fn new(
        id: impl Into<LocationId>,
        name: impl Into<String>,
        kind: LocationKind,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            coordinate,
            capacity: None,
            residents: BTreeSet::new(),
        }
    }

    /// Builder-style capacity setter.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// The broad role of this location.
    pub const fn category(&self) -> LocationCategory {
        self.kind.category()
    }

    /// Number of residents, saturating at `u32::MAX`.
    pub fn resident_count(&self) -> u32 {
        u32::try_from(self.residents.len()).unwrap_or(u32::MAX)
    }

    /// Whether another resident fits. Uncapacitated locations always fit.
    pub fn has_vacancy(&self) -> bool {
        self.capacity
            .is_none_or(|capacity| self.resident_count() < capacity)
    }
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// The five psychological needs of a villager, each in `0..=100`.
///
/// Higher is better: a `food` of 100 means fully fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Needs {
    /// Satiation.
    pub food: u32,
    /// Sense of security.
    pub safety: u32,
    /// Financial comfort.
    pub wealth: u32,
    /// Companionship.
    pub social: u32,
    /// Energy.
    pub rest: u32,
}

impl Needs {
    /// Create a need vector, clamping each value to `0..=100`.
    pub fn new(food: u32, safety: u32, wealth: u32, social: u32, rest: u32) -> Self {
        Self {
            food,
            safety,
            wealth,
            social,
            rest,
        }
        .clamped()
    }

    /// Return a copy with every scalar clamped to `0..=100`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            food: self.food.min(NEED_MAX),
            safety: self.safety.min(NEED_MAX),
            wealth: self.wealth.min(NEED_MAX),
            social: self.social.min(NEED_MAX),
            rest: self.rest.min(NEED_MAX),
        }
    }
}

impl Default for Needs {
    fn default() -> Self {
        Self {
            food: 80,
            safety: 90,
            wealth: 50,
            social: 60,
            rest: 80,
        }
    }
}

/// A registered villager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Agent {
    /// Unique name.
    pub id: AgentId,
    /// Free-form occupation as recorded (may not match a known trade).
    pub occupation: String,
    /// Current need vector.
    pub needs: Needs,
    /// Where the villager is now.
    pub location: LocationId,
    /// What the villager is doing now.
    pub activity: Activity,
    /// Assigned home.
    pub home: LocationId,
    /// Assigned workplace, if the occupation maps to one.
    pub workplace: Option<LocationId>,
}

impl Agent {
    /// The parsed occupation, if it is a known trade.
    pub fn trade(&self) -> Option<Occupation> {
        Occupation::parse(&self.occupation)
    }
}

/// Registration input for a villager.
///
/// Everything except the name and occupation is optional; the scheduler
/// fills in missing assignments at registration. Persistence layers
/// re-hydrate villagers by sending fully-populated profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentProfile {
    /// Unique name.
    pub id: AgentId,
    /// Free-form occupation.
    pub occupation: String,
    /// Starting needs.
    pub needs: Needs,
    /// Preferred or previously assigned home.
    pub home: Option<LocationId>,
    /// Previously assigned workplace.
    pub workplace: Option<LocationId>,
    /// Last known location.
    pub location: Option<LocationId>,
    /// Last known activity.
    pub activity: Option<Activity>,
}

impl AgentProfile {
    /// A fresh villager with default needs and no assignments.
    pub fn new(name: impl Into<AgentId>, occupation: impl Into<String>) -> Self {
        Self {
            id: name.into(),
            occupation: occupation.into(),
            needs: Needs::default(),
            home: None,
            workplace: None,
            location: None,
            activity: None,
        }
    }

    /// Builder-style needs setter.
    #[must_use]
    pub const fn with_needs(mut self, needs: Needs) -> Self {
        self.needs = needs;
        self
    }

    /// Builder-style preferred home setter.
    #[must_use]
    pub fn with_home(mut self, home: impl Into<LocationId>) -> Self {
        self.home = Some(home.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Production
// ---------------------------------------------------------------------------

/// An in-flight (or recently finished) production commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ProductionTask {
    /// The producing villager.
    pub agent_id: AgentId,
    /// The trade whose recipe is being followed.
    pub occupation: Occupation,
    /// What is being produced.
    pub output: ResourceKind,
    /// How much will be produced.
    pub quantity: u32,
    /// Absolute game hour the task started.
    pub start_hour: u64,
    /// Absolute game hour at which the task completes.
    pub end_hour: u64,
    /// Whether the output has been delivered.
    pub completed: bool,
    /// Storage that supplied inputs and receives output.
    pub storage: Option<StorageId>,
    /// Units actually deposited on completion (may be below `quantity`
    /// when the storage was full).
    pub delivered: u32,
}

impl ProductionTask {
    /// Whether the task is still running.
    pub const fn is_active(&self) -> bool {
        !self.completed
    }

    /// Whether the task is due at `hour`.
    pub const fn is_due(&self, hour: u64) -> bool {
        !self.completed && self.end_hour <= hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_are_clamped_on_construction() {
        let needs = Needs::new(150, 90, 30, 200, 60);
        assert_eq!(needs.food, 100);
        assert_eq!(needs.social, 100);
        assert_eq!(needs.wealth, 30);
    }

    #[test]
    fn uncapacitated_location_always_has_vacancy() {
        let mut square = Location::new("square", "Square", LocationKind::Square, Coordinate::default());
        for n in 0..50 {
            square.residents.insert(AgentId::new(format!("v{n}")));
        }
        assert!(square.has_vacancy());
    }

    #[test]
    fn capacitated_home_fills_up() {
        let mut house = Location::new("house-1", "House", LocationKind::House, Coordinate::default())
            .with_capacity(1);
        assert!(house.has_vacancy());
        house.residents.insert(AgentId::new("Marcus"));
        assert!(!house.has_vacancy());
        assert_eq!(house.category(), LocationCategory::Home);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn agent_trade_parses_free_form_occupation() {
        let agent = Agent {
            id: AgentId::new("Sarah"),
            occupation: String::from("Baker"),
            needs: Needs::default(),
            location: LocationId::new("house-1"),
            activity: Activity::Idle,
            home: LocationId::new("house-1"),
            workplace: None,
        };
        assert_eq!(agent.trade(), Some(Occupation::Baker));
    }

    #[test]
    fn task_due_only_when_active() {
        let mut task = ProductionTask {
            agent_id: AgentId::new("Emma"),
            occupation: Occupation::Farmer,
            output: ResourceKind::Food,
            quantity: 4,
            start_hour: 8,
            end_hour: 12,
            completed: false,
            storage: None,
            delivered: 0,
        };
        assert!(!task.is_due(11));
        assert!(task.is_due(12));
        task.completed = true;
        assert!(!task.is_due(13));
    }
}
