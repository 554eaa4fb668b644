//! Daily cycle: the checkpoint pipeline that moves villagers through the day.
//!
//! Four checkpoints per day (dawn 06:00, midday 12:00, evening 18:00,
//! night 22:00). At each one every villager goes through the same
//! phases, strictly in order and as one batch:
//!
//! 1. **Decay** -- every need vector loses its per-checkpoint decay.
//! 2. **Safety scan** -- villagers below the critical safety level are
//!    flagged. The flag is informational; the decision override in the
//!    next phase does the relocating.
//! 3. **Decision** -- each villager picks a destination and activity from
//!    its just-decayed needs.
//! 4. **Movement** -- each decision is applied.
//! 5. **Occupancy** -- a read-only head count per location.
//!
//! Repeat calls for the same checkpoint hour are ignored, so a clock
//! driver may deliver an hour more than once without double decay.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use hamlet_agents::{Decision, NeedsConfig, create_agent, decide, needs};
use hamlet_types::{Activity, Agent, AgentId, AgentProfile, Checkpoint, LocationId, ThreatSeverity};
use hamlet_world::LocationRegistry;
use serde::Serialize;
use tracing::{debug, info, warn};

/// One villager's move at a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMove {
    /// The villager.
    pub agent: AgentId,
    /// Where they were.
    pub from: LocationId,
    /// The decision that moved them.
    pub decision: Decision,
}

/// Outcome of one checkpoint run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointReport {
    /// Which checkpoint ran.
    pub checkpoint: Checkpoint,
    /// Villagers whose safety was critical after decay.
    pub critical: Vec<AgentId>,
    /// Every villager's decision, in agent order.
    pub moves: Vec<AgentMove>,
    /// Villagers per location after movement.
    pub occupancy: BTreeMap<LocationId, usize>,
}

/// Owner of the location registry and every villager.
#[derive(Debug, Clone)]
pub struct DailyScheduler {
    /// Places, homes, and workplaces.
    registry: LocationRegistry,
    /// Villagers keyed by name.
    agents: BTreeMap<AgentId, Agent>,
    /// Decay and decision tunables.
    config: NeedsConfig,
    /// Hour of the last processed checkpoint.
    last_checkpoint_hour: Option<u8>,
}

impl DailyScheduler {
    /// Create a scheduler with no villagers.
    pub const fn new(registry: LocationRegistry, config: NeedsConfig) -> Self {
        Self {
            registry,
            agents: BTreeMap::new(),
            config,
            last_checkpoint_hour: None,
        }
    }

    /// The location registry.
    pub const fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    /// The needs configuration.
    pub const fn config(&self) -> &NeedsConfig {
        &self.config
    }

    /// All villagers in name order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Look up a villager by name.
    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.get(name)
    }

    /// Number of villagers.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Hour of the last processed checkpoint, if any has run.
    pub const fn last_checkpoint_hour(&self) -> Option<u8> {
        self.last_checkpoint_hour
    }

    /// Register a villager. Missing home and workplace are assigned by the
    /// registry. Registering a name again replaces the earlier record.
    pub fn register_agent(&mut self, profile: AgentProfile) -> &Agent {
        let agent = create_agent(profile, &mut self.registry);
        let id = agent.id.clone();
        if self.agents.contains_key(&id) {
            warn!(agent = %id, "Agent re-registered, replacing record");
        }
        info!(
            agent = %id,
            occupation = agent.occupation.as_str(),
            home = %agent.home,
            "Agent registered"
        );
        match self.agents.entry(id) {
            Entry::Occupied(mut slot) => {
                slot.insert(agent);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(agent),
        }
    }

    /// Run the checkpoint pipeline if `hour` is a checkpoint not yet
    /// processed. Returns the report when it ran.
    pub fn on_hour_change(&mut self, hour: u8) -> Option<CheckpointReport> {
        let checkpoint = Checkpoint::at_hour(hour)?;
        if self.last_checkpoint_hour == Some(hour) {
            debug!(hour, "Checkpoint already processed");
            return None;
        }
        self.last_checkpoint_hour = Some(hour);
        info!(hour, checkpoint = ?checkpoint, agents = self.agents.len(), "Checkpoint started");

        // 1. Decay
        for agent in self.agents.values_mut() {
            needs::apply_decay(&mut agent.needs, &self.config);
        }

        // 2. Safety scan
        let critical: Vec<AgentId> = self
            .agents
            .values()
            .filter(|agent| needs::is_critical(&agent.needs, &self.config))
            .map(|agent| agent.id.clone())
            .collect();
        if !critical.is_empty() {
            warn!(hour, count = critical.len(), "Villagers in danger");
        }

        // 3. Decision
        let decisions: Vec<(AgentId, Decision)> = self
            .agents
            .values()
            .map(|agent| (agent.id.clone(), decide(agent, hour, &self.registry, &self.config)))
            .collect();

        // 4. Movement
        let mut moves = Vec::with_capacity(decisions.len());
        for (id, decision) in decisions {
            let Some(agent) = self.agents.get_mut(&id) else {
                continue;
            };
            debug!(
                agent = %id,
                from = %agent.location,
                to = %decision.location,
                activity = ?decision.activity,
                priority = decision.priority,
                reason = ?decision.reason,
                "Agent decided"
            );
            let from = std::mem::replace(&mut agent.location, decision.location.clone());
            agent.activity = decision.activity;
            moves.push(AgentMove {
                agent: id,
                from,
                decision,
            });
        }

        // 5. Occupancy
        let occupancy = self.occupancy();
        info!(
            hour,
            checkpoint = ?checkpoint,
            occupied_locations = occupancy.len(),
            working = self.count_activity(Activity::Working),
            fleeing = self.count_activity(Activity::Fleeing),
            "Checkpoint completed"
        );

        Some(CheckpointReport {
            checkpoint,
            critical,
            moves,
            occupancy,
        })
    }

    /// Apply one recovery tick to every villager for its current activity.
    /// Nobody moves.
    pub fn update_needs(&mut self) {
        for agent in self.agents.values_mut() {
            needs::apply_recovery(&mut agent.needs, agent.activity);
        }
        debug!(agents = self.agents.len(), "Needs recovered");
    }

    /// Drop every villager's safety by the severity's fixed amount.
    pub fn trigger_threat(&mut self, severity: ThreatSeverity) {
        for agent in self.agents.values_mut() {
            needs::apply_threat(&mut agent.needs, severity);
        }
        warn!(severity = ?severity, drop = severity.safety_drop(), "Threat triggered");
    }

    /// Raise every villager's safety by `amount`.
    pub fn restore_safety(&mut self, amount: u32) {
        for agent in self.agents.values_mut() {
            needs::restore_safety(&mut agent.needs, amount);
        }
        info!(amount, "Safety restored");
    }

    /// Raise every villager's safety by the configured default amount.
    pub fn restore_safety_default(&mut self) {
        self.restore_safety(self.config.restore_safety_amount);
    }

    /// The next checkpoint strictly after `hour`, wrapping to dawn.
    pub fn next_checkpoint(hour: u8) -> Checkpoint {
        Checkpoint::next_after(hour)
    }

    /// Villagers per location.
    pub fn occupancy(&self) -> BTreeMap<LocationId, usize> {
        let mut counts: BTreeMap<LocationId, usize> = BTreeMap::new();
        for agent in self.agents.values() {
            let entry = counts.entry(agent.location.clone()).or_insert(0);
            *entry = entry.saturating_add(1);
        }
        counts
    }

    fn count_activity(&self, activity: Activity) -> usize {
        self.agents
            .values()
            .filter(|agent| agent.activity == activity)
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hamlet_types::{LocationCategory, Needs};
    use hamlet_world::create_starting_village;

    use super::*;

    fn scheduler() -> DailyScheduler {
        DailyScheduler::new(create_starting_village(9).unwrap(), NeedsConfig::default())
    }

    #[test]
    fn registration_places_agent_at_home_resting() {
        let mut sched = scheduler();
        let agent = sched.register_agent(AgentProfile::new("Ann", "farmer"));
        assert_eq!(agent.location, agent.home);
        assert_eq!(agent.activity, Activity::Resting);
        assert_eq!(agent.workplace.as_ref().map(LocationId::as_str), Some("farm"));
    }

    #[test]
    fn reregistration_replaces_record() {
        let mut sched = scheduler();
        sched.register_agent(AgentProfile::new("Ann", "farmer"));
        sched.register_agent(
            AgentProfile::new("Ann", "baker").with_needs(Needs::new(10, 90, 50, 60, 80)),
        );
        assert_eq!(sched.agent_count(), 1);
        let ann = sched.agent("Ann").unwrap();
        assert_eq!(ann.occupation, "baker");
        assert_eq!(ann.needs.food, 10);
    }

    #[test]
    fn reregistration_with_new_home_moves_out_of_old_one() {
        let mut sched = scheduler();
        let first = sched.register_agent(AgentProfile::new("Ann", "farmer")).home.clone();
        assert_ne!(first.as_str(), "house-oak");

        sched.register_agent(AgentProfile::new("Ann", "farmer").with_home("house-oak"));

        let listing: Vec<&str> = sched
            .registry()
            .by_category(LocationCategory::Home)
            .into_iter()
            .filter(|home| home.residents.contains("Ann"))
            .map(|home| home.id.as_str())
            .collect();
        assert_eq!(listing, vec!["house-oak"]);
        assert_eq!(sched.agent("Ann").unwrap().home.as_str(), "house-oak");
    }

    #[test]
    fn non_checkpoint_hours_are_ignored() {
        let mut sched = scheduler();
        sched.register_agent(AgentProfile::new("Ann", "farmer"));
        let before = sched.agent("Ann").unwrap().needs;
        assert!(sched.on_hour_change(7).is_none());
        assert_eq!(sched.agent("Ann").unwrap().needs, before);
        assert_eq!(sched.last_checkpoint_hour(), None);
    }

    #[test]
    fn repeated_checkpoint_decays_once() {
        let mut sched = scheduler();
        sched.register_agent(
            AgentProfile::new("Ann", "farmer").with_needs(Needs::new(80, 90, 70, 60, 80)),
        );
        assert!(sched.on_hour_change(12).is_some());
        let after_first = sched.agent("Ann").unwrap().needs;
        assert_eq!(after_first.food, 72);
        assert!(sched.on_hour_change(12).is_none());
        assert_eq!(sched.agent("Ann").unwrap().needs, after_first);
    }

    #[test]
    fn decay_precedes_decision() {
        let mut sched = scheduler();
        sched.register_agent(
            AgentProfile::new("Ann", "farmer").with_needs(Needs::new(80, 90, 30, 50, 60)),
        );
        let report = sched.on_hour_change(12).unwrap();
        let ann = sched.agent("Ann").unwrap();
        assert_eq!(ann.needs.wealth, 25);
        assert_eq!(ann.activity, Activity::Working);
        assert_eq!(ann.location.as_str(), "farm");
        let mv = report.moves.first().unwrap();
        assert!((mv.decision.priority - 75.0).abs() < 1e-9);
        assert_eq!(report.occupancy.get("farm").copied(), Some(1));
    }

    #[test]
    fn safety_scan_flags_and_flees() {
        let mut sched = scheduler();
        sched.register_agent(
            AgentProfile::new("Tom", "guard").with_needs(Needs::new(5, 16, 50, 50, 50)),
        );
        sched.register_agent(AgentProfile::new("Ann", "farmer"));
        let report = sched.on_hour_change(6).unwrap();
        assert_eq!(report.critical, vec![AgentId::new("Tom")]);
        let tom = sched.agent("Tom").unwrap();
        assert_eq!(tom.activity, Activity::Fleeing);
        assert_eq!(tom.location.as_str(), "keep");
    }

    #[test]
    fn threat_and_restore() {
        let mut sched = scheduler();
        sched.register_agent(AgentProfile::new("Ann", "farmer"));
        sched.trigger_threat(ThreatSeverity::Critical);
        assert_eq!(sched.agent("Ann").unwrap().needs.safety, 20);
        sched.trigger_threat(ThreatSeverity::Major);
        assert_eq!(sched.agent("Ann").unwrap().needs.safety, 0);
        sched.restore_safety_default();
        assert_eq!(sched.agent("Ann").unwrap().needs.safety, 50);
        sched.restore_safety(80);
        assert_eq!(sched.agent("Ann").unwrap().needs.safety, 100);
    }

    #[test]
    fn update_needs_does_not_move() {
        let mut sched = scheduler();
        sched.register_agent(
            AgentProfile::new("Ann", "farmer").with_needs(Needs::new(50, 90, 50, 60, 50)),
        );
        let before = sched.agent("Ann").unwrap().location.clone();
        sched.update_needs();
        let ann = sched.agent("Ann").unwrap();
        assert_eq!(ann.location, before);
        // Resting: rest +40, food -5.
        assert_eq!(ann.needs.rest, 90);
        assert_eq!(ann.needs.food, 45);
    }

    #[test]
    fn next_checkpoint_wraps() {
        assert_eq!(DailyScheduler::next_checkpoint(5), Checkpoint::Dawn);
        assert_eq!(DailyScheduler::next_checkpoint(6), Checkpoint::Midday);
        assert_eq!(DailyScheduler::next_checkpoint(21), Checkpoint::Night);
        assert_eq!(DailyScheduler::next_checkpoint(22), Checkpoint::Dawn);
        assert_eq!(DailyScheduler::next_checkpoint(23), Checkpoint::Dawn);
    }

    #[test]
    fn occupancy_counts_every_agent_once() {
        let mut sched = scheduler();
        for (name, occ) in [("Ann", "farmer"), ("Hilda", "baker"), ("Tom", "guard")] {
            sched.register_agent(AgentProfile::new(name, occ));
        }
        sched.on_hour_change(18);
        let total: usize = sched.occupancy().values().sum();
        assert_eq!(total, 3);
    }
}
