//! Production recipes, keyed by occupation.
//!
//! Every trade that produces something has exactly one recipe. Trades
//! without one (merchants, innkeepers, priests, guards, laborers) simply
//! never start production.

use std::collections::BTreeMap;

use hamlet_types::{Occupation, ResourceKind};

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

/// A production rule: inputs consumed at start, output delivered after
/// `duration_hours`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// The resource produced.
    pub output: ResourceKind,
    /// Units produced per run.
    pub output_quantity: u32,
    /// Game hours from start to delivery.
    pub duration_hours: u64,
    /// Materials consumed at start (resource -> quantity). Empty for
    /// gathering trades.
    pub inputs: BTreeMap<ResourceKind, u32>,
}

impl Recipe {
    /// Recipe with no inputs.
    fn gather(output: ResourceKind, output_quantity: u32, duration_hours: u64) -> Self {
        Self {
            output,
            output_quantity,
            duration_hours,
            inputs: BTreeMap::new(),
        }
    }

    /// Recipe consuming `inputs`.
    fn craft<const N: usize>(
        output: ResourceKind,
        output_quantity: u32,
        duration_hours: u64,
        inputs: [(ResourceKind, u32); N],
    ) -> Self {
        Self {
            output,
            output_quantity,
            duration_hours,
            inputs: BTreeMap::from(inputs),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipe Table
// ---------------------------------------------------------------------------

/// Look up the recipe for a trade.
///
/// - farmer: 4 food over 4h
/// - baker: 2 food -> 10 food over 3h
/// - woodcutter: 4 wood over 3h
/// - miner: 3 ore over 4h
/// - smelter: 3 ore -> 2 iron over 3h
/// - blacksmith: 2 wood + 1 iron -> 1 tools over 4h
/// - carpenter: 3 wood -> 1 furniture over 5h
/// - herbalist: 3 herbs over 2h
/// - healer: 2 herbs -> 1 medicine over 3h
pub fn recipe_for(occupation: Occupation) -> Option<Recipe> {
    match occupation {
        Occupation::Farmer => Some(Recipe::gather(ResourceKind::Food, 4, 4)),
        Occupation::Baker => Some(Recipe::craft(ResourceKind::Food, 10, 3, [(ResourceKind::Food, 2)])),
        Occupation::Woodcutter => Some(Recipe::gather(ResourceKind::Wood, 4, 3)),
        Occupation::Miner => Some(Recipe::gather(ResourceKind::Ore, 3, 4)),
        Occupation::Smelter => Some(Recipe::craft(ResourceKind::Iron, 2, 3, [(ResourceKind::Ore, 3)])),
        Occupation::Blacksmith => Some(Recipe::craft(
            ResourceKind::Tools,
            1,
            4,
            [(ResourceKind::Wood, 2), (ResourceKind::Iron, 1)],
        )),
        Occupation::Carpenter => Some(Recipe::craft(
            ResourceKind::Furniture,
            1,
            5,
            [(ResourceKind::Wood, 3)],
        )),
        Occupation::Herbalist => Some(Recipe::gather(ResourceKind::Herbs, 3, 2)),
        Occupation::Healer => Some(Recipe::craft(
            ResourceKind::Medicine,
            1,
            3,
            [(ResourceKind::Herbs, 2)],
        )),
        Occupation::Merchant
        | Occupation::Innkeeper
        | Occupation::Priest
        | Occupation::Guard
        | Occupation::Laborer => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
