//! Read-only world snapshot for renderers and persistence.
//!
//! A [`WorldSnapshot`] is a plain, serializable copy of everything an
//! observer needs between hours: the time, every villager, every place
//! with its head count, every storage with its fill level, village-wide
//! resource totals, and recent production. Field names are camelCase to
//! match the front end.

use std::collections::BTreeMap;

use hamlet_economy::ResourceTotal;
use hamlet_types::{
    Activity, AgentId, Checkpoint, LocationCategory, LocationId, LocationKind, Needs,
    ProductionTask, ResourceKind, StorageId,
};
use serde::Serialize;

use crate::scheduler::DailyScheduler;
use crate::village::Village;

/// One villager as seen by observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentView {
    /// Unique name.
    pub id: AgentId,
    /// Occupation as recorded.
    pub occupation: String,
    /// Current needs.
    pub needs: Needs,
    /// Current location.
    pub location: LocationId,
    /// Current activity.
    pub activity: Activity,
    /// Assigned home.
    pub home: LocationId,
    /// Assigned workplace.
    pub workplace: Option<LocationId>,
    /// Running production task.
    pub active_task: Option<ProductionTask>,
}

/// One location as seen by observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    /// Identifier.
    pub id: LocationId,
    /// Display name.
    pub name: String,
    /// Kind of place.
    pub kind: LocationKind,
    /// Derived category.
    pub category: LocationCategory,
    /// Map x coordinate.
    pub x: f64,
    /// Map y coordinate.
    pub y: f64,
    /// Resident limit, for homes.
    pub capacity: Option<u32>,
    /// Villagers living here.
    pub residents: u32,
    /// Villagers currently here.
    pub occupants: usize,
}

/// One storage as seen by observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageView {
    /// Identifier.
    pub id: StorageId,
    /// Display name.
    pub name: String,
    /// Shared capacity.
    pub capacity: u32,
    /// Sum of all held goods.
    pub total_stored: u32,
    /// Fill level, `0.0..=100.0`.
    pub fill_percent: f64,
    /// Held goods by kind.
    pub inventory: BTreeMap<ResourceKind, u32>,
}

/// Everything observers can see at one moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    /// Village name.
    pub village: String,
    /// Current day.
    pub day: u64,
    /// Current hour of day.
    pub hour: u8,
    /// Checkpoint at the current hour, if any.
    pub checkpoint: Option<Checkpoint>,
    /// The next checkpoint after the current hour.
    pub next_checkpoint: Checkpoint,
    /// Every villager, in name order.
    pub agents: Vec<AgentView>,
    /// Every location, in ID order.
    pub locations: Vec<LocationView>,
    /// Every storage, in ID order.
    pub storages: Vec<StorageView>,
    /// Village-wide resource totals.
    pub resources: Vec<ResourceTotal>,
    /// Recently completed production, oldest first.
    pub recent_completions: Vec<ProductionTask>,
    /// Emergency homes created so far.
    pub emergency_homes: u32,
}

impl WorldSnapshot {
    /// Copy the current state of `village`.
    pub fn capture(village: &Village) -> Self {
        let clock = village.clock();
        let scheduler = village.scheduler();
        let economy = village.economy();

        let agents = scheduler
            .agents()
            .map(|agent| AgentView {
                id: agent.id.clone(),
                occupation: agent.occupation.clone(),
                needs: agent.needs,
                location: agent.location.clone(),
                activity: agent.activity,
                home: agent.home.clone(),
                workplace: agent.workplace.clone(),
                active_task: economy.active_task(agent.id.as_str()).cloned(),
            })
            .collect();

        let storages = economy
            .all()
            .map(|store| StorageView {
                id: store.id().clone(),
                name: store.name().to_owned(),
                capacity: store.capacity(),
                total_stored: store.total_stored(),
                fill_percent: store.fill_percent(),
                inventory: store.inventory().clone(),
            })
            .collect();

        Self {
            village: village.name().to_owned(),
            day: clock.day(),
            hour: clock.hour(),
            checkpoint: clock.checkpoint(),
            next_checkpoint: DailyScheduler::next_checkpoint(clock.hour()),
            agents,
            locations: location_views(scheduler),
            storages,
            resources: economy.summary(),
            recent_completions: economy.recent_completions().cloned().collect(),
            emergency_homes: scheduler.registry().emergency_home_count(),
        }
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn location_views(scheduler: &DailyScheduler) -> Vec<LocationView> {
    let occupancy = scheduler.occupancy();
    scheduler
        .registry()
        .locations()
        .map(|loc| LocationView {
            id: loc.id.clone(),
            name: loc.name.clone(),
            kind: loc.kind,
            category: loc.category(),
            x: loc.coordinate.x,
            y: loc.coordinate.y,
            capacity: loc.capacity,
            residents: loc.resident_count(),
            occupants: occupancy.get(&loc.id).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;

    #[test]
    fn snapshot_covers_whole_village() {
        let village = Village::from_config(&SimulationConfig::default()).unwrap();
        let snap = village.snapshot();
        assert_eq!(snap.agents.len(), 12);
        assert_eq!(snap.locations.len(), 18);
        assert_eq!(snap.storages.len(), 2);
        assert_eq!(snap.next_checkpoint, Checkpoint::Dawn);
        let occupants: usize = snap.locations.iter().map(|l| l.occupants).sum();
        assert_eq!(occupants, 12);
        let residents: u32 = snap.locations.iter().map(|l| l.residents).sum();
        assert_eq!(residents, 12);
    }

    #[test]
    fn snapshot_json_is_camel_case() {
        let village = Village::from_config(&SimulationConfig::default()).unwrap();
        let json = village.snapshot().to_json().unwrap();
        assert!(json.contains("\"nextCheckpoint\""));
        assert!(json.contains("\"recentCompletions\""));
        assert!(json.contains("\"fillPercent\""));
        assert!(json.contains("\"activeTask\""));
    }

    #[test]
    fn nested_tasks_use_the_same_casing() {
        let mut village = Village::from_config(&SimulationConfig::default()).unwrap();
        for _ in 0..24 {
            village.advance_hour().unwrap();
        }
        let snap = village.snapshot();
        assert!(!snap.recent_completions.is_empty());

        let json = snap.to_json().unwrap();
        for key in ["\"agentId\"", "\"startHour\"", "\"endHour\""] {
            assert!(json.contains(key), "missing {key}");
        }
        for key in ["\"agent_id\"", "\"start_hour\"", "\"end_hour\""] {
            assert!(!json.contains(key), "found {key}");
        }
    }
}
