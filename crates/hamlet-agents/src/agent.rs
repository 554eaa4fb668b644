//! Villager construction.
//!
//! [`create_agent`] turns an [`AgentProfile`] into a live [`Agent`],
//! asking the registry for a home and a workplace when the profile does
//! not name them.

use hamlet_types::{Activity, Agent, AgentProfile};
use hamlet_world::LocationRegistry;
use tracing::debug;

/// Build an agent from a registration profile.
///
/// - The home goes through [`LocationRegistry::assign_home`] with the
///   profile's home as the preference, so residency is always recorded.
/// - The workplace is looked up from the occupation when not given.
/// - Location defaults to home and activity to resting.
pub fn create_agent(profile: AgentProfile, registry: &mut LocationRegistry) -> Agent {
    let AgentProfile {
        id,
        occupation,
        needs,
        home,
        workplace,
        location,
        activity,
    } = profile;

    let home = registry.assign_home(&id, home.as_ref());
    let workplace = workplace.or_else(|| registry.assign_workplace(&id, &occupation));
    let location = location.unwrap_or_else(|| home.clone());
    let activity = activity.unwrap_or(Activity::Resting);

    debug!(
        agent = %id,
        occupation = occupation.as_str(),
        home = %home,
        workplace = ?workplace,
        "Agent created"
    );

    Agent {
        id,
        occupation,
        needs: needs.clamped(),
        location,
        activity,
        home,
        workplace,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hamlet_types::{LocationId, Needs};
    use hamlet_world::create_starting_village;

    use super::*;

    #[test]
    fn fills_home_and_workplace() {
        let mut registry = create_starting_village(3).unwrap();
        let agent = create_agent(AgentProfile::new("Hilda", "Baker"), &mut registry);
        assert_eq!(agent.workplace.as_ref().map(LocationId::as_str), Some("bakery"));
        assert_eq!(agent.location, agent.home);
        assert_eq!(agent.activity, Activity::Resting);
        let home = registry.find(agent.home.as_str()).unwrap();
        assert!(home.residents.contains(&agent.id));
    }

    #[test]
    fn honors_preferred_home() {
        let mut registry = create_starting_village(3).unwrap();
        let profile = AgentProfile::new("Ann", "farmer").with_home("house-ash");
        let agent = create_agent(profile, &mut registry);
        assert_eq!(agent.home.as_str(), "house-ash");
    }

    #[test]
    fn unknown_trade_has_no_workplace() {
        let mut registry = create_starting_village(3).unwrap();
        let agent = create_agent(AgentProfile::new("Pip", "minstrel"), &mut registry);
        assert!(agent.workplace.is_none());
        assert_eq!(agent.occupation, "minstrel");
    }

    #[test]
    fn keeps_explicit_placement() {
        let mut registry = create_starting_village(3).unwrap();
        let mut profile =
            AgentProfile::new("Tom", "guard").with_needs(Needs::new(10, 10, 10, 10, 10));
        profile.location = Some(LocationId::new("tavern"));
        profile.activity = Some(Activity::Socializing);
        let agent = create_agent(profile, &mut registry);
        assert_eq!(agent.location.as_str(), "tavern");
        assert_eq!(agent.activity, Activity::Socializing);
        assert_eq!(agent.workplace.as_ref().map(LocationId::as_str), Some("keep"));
        assert_eq!(agent.needs.food, 10);
    }
}
