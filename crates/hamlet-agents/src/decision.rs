//! The decision engine: where each villager goes and what they do there.
//!
//! Rules are evaluated in a fixed order and the first that fires wins:
//!
//! 1. Safety below the flee threshold: flee to the safehaven (priority
//!    1000, above anything a need can score).
//! 2. Night and tired: rest at home (priority 80).
//! 3. Starving: eat at a food venue (priority 90).
//! 4. Otherwise score the work, eat, socialize, and rest candidates and
//!    take the highest. Ties go to the earlier candidate.
//! 5. Nothing qualifies: idle at home (priority 0).
//!
//! Decisions read the registry but never mutate it.

use hamlet_types::{Activity, Agent, LocationCategory, LocationId};
use hamlet_world::LocationRegistry;
use serde::Serialize;

use crate::config::NeedsConfig;

/// Priority given to fleeing.
pub const FLEE_PRIORITY: f64 = 1000.0;
/// Priority of night-time rest.
pub const NIGHT_REST_PRIORITY: f64 = 80.0;
/// Priority of eating while starving.
pub const STARVING_PRIORITY: f64 = 90.0;

const EAT_WEIGHT: f64 = 0.8;
const SOCIAL_WEIGHT: f64 = 0.7;
const REST_WEIGHT: f64 = 0.6;

/// Which rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Safety critical.
    Flee,
    /// Tired at night.
    NightRest,
    /// Food critical.
    Starving,
    /// Short of money.
    Work,
    /// Hungry.
    Eat,
    /// Lonely.
    Socialize,
    /// Tired.
    Rest,
    /// Nothing pressing.
    Idle,
}

/// The outcome of one decision: a destination and an activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Where to go.
    pub location: LocationId,
    /// What to do there.
    pub activity: Activity,
    /// Score of the winning rule.
    pub priority: f64,
    /// The winning rule.
    pub reason: DecisionReason,
}

impl Decision {
    const fn new(
        location: LocationId,
        activity: Activity,
        priority: f64,
        reason: DecisionReason,
    ) -> Self {
        Self {
            location,
            activity,
            priority,
            reason,
        }
    }
}

/// Headroom below the maximum as a float.
fn deficit(value: u32) -> f64 {
    f64::from(100_u32.saturating_sub(value))
}

/// Choose the next location and activity for `agent` at `hour`.
pub fn decide(
    agent: &Agent,
    hour: u8,
    registry: &LocationRegistry,
    config: &NeedsConfig,
) -> Decision {
    let needs = agent.needs;
    let home = agent.home.clone();

    if needs.safety < config.flee_below {
        let refuge = registry
            .safehaven()
            .map_or_else(|| home.clone(), |loc| loc.id.clone());
        return Decision::new(refuge, Activity::Fleeing, FLEE_PRIORITY, DecisionReason::Flee);
    }

    if config.is_night(hour) && needs.rest < config.tired_below {
        return Decision::new(
            home,
            Activity::Resting,
            NIGHT_REST_PRIORITY,
            DecisionReason::NightRest,
        );
    }

    if needs.food < config.starving_below {
        return Decision::new(
            food_venue(agent, registry),
            Activity::Eating,
            STARVING_PRIORITY,
            DecisionReason::Starving,
        );
    }

    let mut candidates: Vec<Decision> = Vec::with_capacity(4);
    if needs.wealth < config.work_below
        && let Some(workplace) = &agent.workplace
    {
        candidates.push(Decision::new(
            workplace.clone(),
            Activity::Working,
            deficit(needs.wealth),
            DecisionReason::Work,
        ));
    }
    if needs.food < config.hungry_below {
        candidates.push(Decision::new(
            food_venue(agent, registry),
            Activity::Eating,
            deficit(needs.food) * EAT_WEIGHT,
            DecisionReason::Eat,
        ));
    }
    if needs.social < config.lonely_below {
        // Nervous villagers keep company at home rather than venture out.
        let venue = if needs.safety < config.nervous_below {
            home.clone()
        } else {
            social_venue(agent, registry)
        };
        candidates.push(Decision::new(
            venue,
            Activity::Socializing,
            deficit(needs.social) * SOCIAL_WEIGHT,
            DecisionReason::Socialize,
        ));
    }
    if needs.rest < config.tired_below {
        candidates.push(Decision::new(
            home.clone(),
            Activity::Resting,
            deficit(needs.rest) * REST_WEIGHT,
            DecisionReason::Rest,
        ));
    }

    candidates
        .into_iter()
        .fold(None, |best: Option<Decision>, candidate| match best {
            Some(current) if current.priority >= candidate.priority => Some(current),
            _ => Some(candidate),
        })
        .unwrap_or_else(|| Decision::new(home, Activity::Idle, 0.0, DecisionReason::Idle))
}

/// The food venue nearest the agent's home, or home when there is none.
fn food_venue(agent: &Agent, registry: &LocationRegistry) -> LocationId {
    registry
        .nearest_where(agent.home.as_str(), |loc| loc.kind.is_food_venue())
        .map_or_else(|| agent.home.clone(), |loc| loc.id.clone())
}

/// The social venue nearest the agent's home, or home when there is none.
fn social_venue(agent: &Agent, registry: &LocationRegistry) -> LocationId {
    registry
        .nearest_where(agent.home.as_str(), |loc| {
            loc.category() == LocationCategory::Social
        })
        .map_or_else(|| agent.home.clone(), |loc| loc.id.clone())
}
