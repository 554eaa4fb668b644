//! Enumeration types for the Hamlet simulation.
//!
//! Location kinds, activities, occupations, and resource kinds are closed
//! sets. Free-form strings coming from persistence or configuration are
//! parsed into these enums at the edge; a string that matches nothing is
//! simply "unmapped" (no recipe, no workplace) rather than an error.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// The broad role a location plays in the village.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LocationCategory {
    /// A dwelling with a bounded number of residents.
    Home,
    /// A place where an occupation is practised.
    Workplace,
    /// A gathering place for eating and socializing.
    Social,
    /// The fortified refuge villagers flee to when threatened.
    Safehaven,
}

/// The concrete kind of a location. Each kind belongs to exactly one
/// [`LocationCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LocationKind {
    /// A family house.
    House,
    /// Fields worked by farmers.
    Farm,
    /// The village bakery.
    Bakery,
    /// Smithy and smelter.
    Forge,
    /// Carpentry workshop.
    Workshop,
    /// Ore mine.
    Mine,
    /// Woodcutters' camp at the forest edge.
    LumberCamp,
    /// Herb garden.
    HerbGarden,
    /// Open-air market.
    Market,
    /// Tavern and inn.
    Tavern,
    /// Village square.
    Square,
    /// Chapel and infirmary.
    Chapel,
    /// The walled keep.
    Keep,
}

impl LocationKind {
    /// The category this kind of location belongs to.
    pub const fn category(self) -> LocationCategory {
        match self {
            Self::House => LocationCategory::Home,
            Self::Farm
            | Self::Bakery
            | Self::Forge
            | Self::Workshop
            | Self::Mine
            | Self::LumberCamp
            | Self::HerbGarden => LocationCategory::Workplace,
            Self::Market | Self::Tavern | Self::Square | Self::Chapel => LocationCategory::Social,
            Self::Keep => LocationCategory::Safehaven,
        }
    }

    /// Whether villagers can get a meal here.
    pub const fn is_food_venue(self) -> bool {
        matches!(self, Self::Tavern | Self::Market | Self::Bakery)
    }
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

/// What a villager is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Activity {
    /// Practising their occupation.
    Working,
    /// Having a meal.
    Eating,
    /// Spending time with others.
    Socializing,
    /// Sleeping or resting at home.
    Resting,
    /// Running for the safehaven.
    Fleeing,
    /// Nothing in particular.
    Idle,
}

// ---------------------------------------------------------------------------
// Occupations
// ---------------------------------------------------------------------------

/// A villager's trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Occupation {
    /// Grows food.
    Farmer,
    /// Bakes bread from food stores.
    Baker,
    /// Fells trees for wood.
    Woodcutter,
    /// Digs ore.
    Miner,
    /// Smelts ore into iron.
    Smelter,
    /// Forges tools.
    Blacksmith,
    /// Builds furniture.
    Carpenter,
    /// Tends the herb garden.
    Herbalist,
    /// Prepares medicine.
    Healer,
    /// Trades at the market.
    Merchant,
    /// Runs the tavern.
    Innkeeper,
    /// Keeps the chapel.
    Priest,
    /// Watches from the keep.
    Guard,
    /// Takes odd jobs; has no fixed workplace.
    Laborer,
}

impl Occupation {
    /// Every occupation, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Farmer,
        Self::Baker,
        Self::Woodcutter,
        Self::Miner,
        Self::Smelter,
        Self::Blacksmith,
        Self::Carpenter,
        Self::Herbalist,
        Self::Healer,
        Self::Merchant,
        Self::Innkeeper,
        Self::Priest,
        Self::Guard,
        Self::Laborer,
    ];

    /// Lower-case name, as used in configuration and persistence.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Farmer => "farmer",
            Self::Baker => "baker",
            Self::Woodcutter => "woodcutter",
            Self::Miner => "miner",
            Self::Smelter => "smelter",
            Self::Blacksmith => "blacksmith",
            Self::Carpenter => "carpenter",
            Self::Herbalist => "herbalist",
            Self::Healer => "healer",
            Self::Merchant => "merchant",
            Self::Innkeeper => "innkeeper",
            Self::Priest => "priest",
            Self::Guard => "guard",
            Self::Laborer => "laborer",
        }
    }

    /// Parse a free-form occupation string, ignoring case and surrounding
    /// whitespace. Returns `None` for anything not in the catalog.
    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_lowercase();
        Self::ALL.into_iter().find(|occ| occ.name() == needle)
    }

    /// The kind of location this occupation works at, if any.
    pub const fn workplace_kind(self) -> Option<LocationKind> {
        match self {
            Self::Farmer => Some(LocationKind::Farm),
            Self::Baker => Some(LocationKind::Bakery),
            Self::Woodcutter => Some(LocationKind::LumberCamp),
            Self::Miner => Some(LocationKind::Mine),
            Self::Smelter | Self::Blacksmith => Some(LocationKind::Forge),
            Self::Carpenter => Some(LocationKind::Workshop),
            Self::Herbalist => Some(LocationKind::HerbGarden),
            Self::Healer | Self::Priest => Some(LocationKind::Chapel),
            Self::Merchant => Some(LocationKind::Market),
            Self::Innkeeper => Some(LocationKind::Tavern),
            Self::Guard => Some(LocationKind::Keep),
            Self::Laborer => None,
        }
    }
}

impl core::fmt::Display for Occupation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Processing stage of a resource. Ordering is `Raw < Processed < Crafted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ResourceCategory {
    /// Gathered straight from the land.
    Raw,
    /// Refined from raw inputs.
    Processed,
    /// Finished goods.
    Crafted,
}

/// A kind of good held in storages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ResourceKind {
    /// Bread, grain, and other provisions.
    Food,
    /// Medicinal herbs.
    Herbs,
    /// Unsmelted ore.
    Ore,
    /// Timber.
    Wood,
    /// Smelted iron bars.
    Iron,
    /// Chairs, tables, and beds.
    Furniture,
    /// Salves and tinctures.
    Medicine,
    /// Hand tools.
    Tools,
}

impl ResourceKind {
    /// Processing stage of this resource.
    pub const fn category(self) -> ResourceCategory {
        match self {
            Self::Food | Self::Herbs | Self::Ore | Self::Wood => ResourceCategory::Raw,
            Self::Iron => ResourceCategory::Processed,
            Self::Furniture | Self::Medicine | Self::Tools => ResourceCategory::Crafted,
        }
    }

    /// Lower-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Herbs => "herbs",
            Self::Ore => "ore",
            Self::Wood => "wood",
            Self::Iron => "iron",
            Self::Furniture => "furniture",
            Self::Medicine => "medicine",
            Self::Tools => "tools",
        }
    }
}

// ---------------------------------------------------------------------------
// Daily schedule
// ---------------------------------------------------------------------------

/// One of the four fixed hours at which every villager is re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Checkpoint {
    /// 06:00.
    Dawn,
    /// 12:00.
    Midday,
    /// 18:00.
    Evening,
    /// 22:00.
    Night,
}

impl Checkpoint {
    /// All checkpoints in chronological order.
    pub const ALL: [Self; 4] = [Self::Dawn, Self::Midday, Self::Evening, Self::Night];

    /// Hour of day (0-23) at which this checkpoint fires.
    pub const fn hour(self) -> u8 {
        match self {
            Self::Dawn => 6,
            Self::Midday => 12,
            Self::Evening => 18,
            Self::Night => 22,
        }
    }

    /// The checkpoint firing at `hour`, if any.
    pub fn at_hour(hour: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|cp| cp.hour() == hour)
    }

    /// The next checkpoint strictly after `hour`, wrapping to tomorrow's
    /// [`Checkpoint::Dawn`] once today's are exhausted.
    pub fn next_after(hour: u8) -> Self {
        Self::ALL
            .into_iter()
            .find(|cp| cp.hour() > hour)
            .unwrap_or(Self::Dawn)
    }
}

// ---------------------------------------------------------------------------
// Threats
// ---------------------------------------------------------------------------

/// Severity tier of an injected threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ThreatSeverity {
    /// Wolves at the edge of the fields.
    Minor,
    /// Bandits on the road.
    Major,
    /// Raiders at the gate.
    Critical,
}

impl ThreatSeverity {
    /// How much safety every villager loses.
    pub const fn safety_drop(self) -> u32 {
        match self {
            Self::Minor => 20,
            Self::Major => 40,
            Self::Critical => 70,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupation_parse_ignores_case() {
        assert_eq!(Occupation::parse("Baker"), Some(Occupation::Baker));
        assert_eq!(Occupation::parse("  BLACKSMITH "), Some(Occupation::Blacksmith));
        assert_eq!(Occupation::parse("astronaut"), None);
    }

    #[test]
    fn every_occupation_name_parses_back() {
        for occ in Occupation::ALL {
            assert_eq!(Occupation::parse(occ.name()), Some(occ));
        }
    }

    #[test]
    fn laborer_has_no_workplace() {
        assert!(Occupation::Laborer.workplace_kind().is_none());
        assert_eq!(Occupation::Farmer.workplace_kind(), Some(LocationKind::Farm));
    }

    #[test]
    fn resource_categories_are_ordered() {
        assert!(ResourceCategory::Raw < ResourceCategory::Processed);
        assert!(ResourceCategory::Processed < ResourceCategory::Crafted);
        assert_eq!(ResourceKind::Iron.category(), ResourceCategory::Processed);
        assert_eq!(ResourceKind::Tools.category(), ResourceCategory::Crafted);
    }

    #[test]
    fn checkpoint_lookup() {
        assert_eq!(Checkpoint::at_hour(6), Some(Checkpoint::Dawn));
        assert_eq!(Checkpoint::at_hour(22), Some(Checkpoint::Night));
        assert_eq!(Checkpoint::at_hour(7), None);
    }

    #[test]
    fn next_checkpoint_wraps_to_dawn() {
        assert_eq!(Checkpoint::next_after(0), Checkpoint::Dawn);
        assert_eq!(Checkpoint::next_after(6), Checkpoint::Midday);
        assert_eq!(Checkpoint::next_after(13), Checkpoint::Evening);
        assert_eq!(Checkpoint::next_after(21), Checkpoint::Night);
        assert_eq!(Checkpoint::next_after(22), Checkpoint::Dawn);
        assert_eq!(Checkpoint::next_after(23), Checkpoint::Dawn);
    }

    #[test]
    fn location_kind_categories() {
        assert_eq!(LocationKind::House.category(), LocationCategory::Home);
        assert_eq!(LocationKind::Keep.category(), LocationCategory::Safehaven);
        assert_eq!(LocationKind::Tavern.category(), LocationCategory::Social);
        assert!(LocationKind::Tavern.is_food_venue());
        assert!(!LocationKind::Square.is_food_venue());
    }

    #[test]
    fn threat_tiers() {
        assert_eq!(ThreatSeverity::Minor.safety_drop(), 20);
        assert_eq!(ThreatSeverity::Major.safety_drop(), 40);
        assert_eq!(ThreatSeverity::Critical.safety_drop(), 70);
    }
}
