//! The resource manager: storages plus in-flight and completed production.
//!
//! [`ResourceManager`] owns every [`Storage`] in the village, at most one
//! active [`ProductionTask`] per villager, and a bounded history of
//! completed tasks.
//!
//! # Rules
//!
//! - **All-or-nothing start**: a recipe's inputs are consumed only when the
//!   named storage holds every one of them.
//! - **Absolute hours**: tasks carry `day * 24 + hour` so a task started at
//!   22:00 completes after midnight.
//! - **Bounded delivery**: output that does not fit in the target storage
//!   is lost and logged. It is never created past capacity.
//! - **Conserving transfer**: goods moved between storages are never
//!   created or destroyed.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, VecDeque};

use hamlet_types::{
    AgentId, Coordinate, Occupation, ProductionTask, ResourceCategory, ResourceKind, StorageId,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::recipe::recipe_for;
use crate::storage::Storage;

/// Default number of completed tasks retained.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Village-wide total for one resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTotal {
    /// The resource.
    pub kind: ResourceKind,
    /// Its category.
    pub category: ResourceCategory,
    /// Quantity summed across all storages.
    pub total: u32,
}

// ---------------------------------------------------------------------------
// ResourceManager
// ---------------------------------------------------------------------------

/// Owner of all storages and production tasks.
#[derive(Debug, Clone)]
pub struct ResourceManager {
    /// Storages keyed by ID.
    storages: BTreeMap<StorageId, Storage>,
    /// At most one active task per agent.
    active: BTreeMap<AgentId, ProductionTask>,
    /// Recently completed tasks, oldest first.
    history: VecDeque<ProductionTask>,
    /// Maximum length of `history`.
    history_limit: usize,
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceManager {
    /// Create an empty manager with the default history limit.
    pub const fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an empty manager retaining at most `history_limit` completed
    /// tasks.
    pub const fn with_history_limit(history_limit: usize) -> Self {
        Self {
            storages: BTreeMap::new(),
            active: BTreeMap::new(),
            history: VecDeque::new(),
            history_limit,
        }
    }

    // -----------------------------------------------------------------------
    // Storages
    // -----------------------------------------------------------------------

    /// Register a storage. An existing storage with the same ID is
    /// replaced, contents included.
    pub fn create_storage(
        &mut self,
        id: impl Into<StorageId>,
        name: impl Into<String>,
        capacity: u32,
        coordinate: Coordinate,
    ) -> &Storage {
        let storage = Storage::new(id, name, capacity, coordinate);
        info!(storage = %storage.id(), capacity, "Storage created");
        match self.storages.entry(storage.id().clone()) {
            Entry::Occupied(mut slot) => {
                slot.insert(storage);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(storage),
        }
    }

    /// Look up a storage.
    pub fn find(&self, id: &str) -> Option<&Storage> {
        self.storages.get(id)
    }

    /// Look up a storage for direct deposits or withdrawals.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Storage> {
        self.storages.get_mut(id)
    }

    /// All storages in ID order.
    pub fn all(&self) -> impl Iterator<Item = &Storage> {
        self.storages.values()
    }

    /// The storage nearest to `point`. Ties go to the lower ID.
    pub fn nearest_storage(&self, point: Coordinate) -> Option<&Storage> {
        self.storages.values().fold(None, |best: Option<&Storage>, candidate| {
            let d = candidate.coordinate().distance_to(point);
            match best {
                Some(current) if current.coordinate().distance_to(point) <= d => Some(current),
                _ => Some(candidate),
            }
        })
    }

    /// Sum of one kind across every storage.
    pub fn total_of(&self, kind: ResourceKind) -> u32 {
        self.storages
            .values()
            .fold(0_u32, |acc, s| acc.saturating_add(s.quantity(kind)))
    }

    // -----------------------------------------------------------------------
    // Production
    // -----------------------------------------------------------------------

    /// The agent's running task, if any.
    pub fn active_task(&self, agent: &str) -> Option<&ProductionTask> {
        self.active.get(agent)
    }

    /// All running tasks in agent order.
    pub fn active_tasks(&self) -> impl Iterator<Item = &ProductionTask> {
        self.active.values()
    }

    /// Completed tasks, oldest first.
    pub fn recent_completions(&self) -> impl Iterator<Item = &ProductionTask> {
        self.history.iter()
    }

    /// Start a task for `agent` following the recipe for `occupation`.
    ///
    /// Returns `None` when the occupation has no recipe, or when the recipe
    /// needs inputs and `storage` is missing or short of any of them. In
    /// that case nothing is consumed. If the agent already has a running
    /// task, that task is returned unchanged.
    pub fn start_production(
        &mut self,
        agent: &AgentId,
        occupation: &str,
        hour: u64,
        storage: Option<&StorageId>,
    ) -> Option<ProductionTask> {
        let Some((occupation, recipe)) =
            Occupation::parse(occupation).and_then(|occ| recipe_for(occ).map(|r| (occ, r)))
        else {
            debug!(agent = %agent, occupation, "No recipe for occupation");
            return None;
        };
        if let Some(existing) = self.active.get(agent) {
            return Some(existing.clone());
        }

        let storage = storage.filter(|id| self.storages.contains_key(id.as_str()));
        if !recipe.inputs.is_empty() {
            let Some(store) = storage.and_then(|id| self.storages.get_mut(id.as_str())) else {
                warn!(agent = %agent, %occupation, "Production declined: no input storage");
                return None;
            };
            if !store.has_all(&recipe.inputs) {
                debug!(
                    agent = %agent,
                    %occupation,
                    storage = %store.id(),
                    "Production declined: missing inputs"
                );
                return None;
            }
            for (kind, qty) in &recipe.inputs {
                store.remove(*kind, *qty);
            }
        }

        let task = ProductionTask {
            agent_id: agent.clone(),
            occupation,
            output: recipe.output,
            quantity: recipe.output_quantity,
            start_hour: hour,
            end_hour: hour.saturating_add(recipe.duration_hours),
            completed: false,
            storage: storage.cloned(),
            delivered: 0,
        };
        info!(
            agent = %agent,
            %occupation,
            output = task.output.name(),
            quantity = task.quantity,
            end_hour = task.end_hour,
            "Production started"
        );
        self.active.insert(agent.clone(), task.clone());
        Some(task)
    }

    /// Complete every task due at `hour`, depositing output. Returns the
    /// tasks completed this call.
    pub fn update_production(&mut self, hour: u64) -> Vec<ProductionTask> {
        let due: Vec<AgentId> = self
            .active
            .iter()
            .filter(|(_, task)| task.is_due(hour))
            .map(|(agent, _)| agent.clone())
            .collect();

        let mut completed = Vec::with_capacity(due.len());
        for agent in due {
            let Some(mut task) = self.active.remove(&agent) else {
                continue;
            };
            task.completed = true;
            task.delivered = self.deliver(&task);
            let lost = task.quantity.saturating_sub(task.delivered);
            if lost > 0 {
                warn!(
                    agent = %agent,
                    output = task.output.name(),
                    lost,
                    "Production output lost: storage full"
                );
            }
            info!(
                agent = %agent,
                output = task.output.name(),
                delivered = task.delivered,
                "Production completed"
            );
            completed.push(task.clone());
            self.push_history(task);
        }
        completed
    }

    /// Deposit a finished task's output. The task's own storage is used
    /// when it still exists, otherwise the storage with the most free room.
    fn deliver(&mut self, task: &ProductionTask) -> u32 {
        let target = task
            .storage
            .as_ref()
            .filter(|id| self.storages.contains_key(id.as_str()))
            .cloned()
            .or_else(|| self.roomiest_storage());
        target
            .and_then(|id| self.storages.get_mut(&id))
            .map_or(0, |store| store.add(task.output, task.quantity))
    }

    /// ID of the storage with the most free capacity (lowest ID on ties).
    fn roomiest_storage(&self) -> Option<StorageId> {
        self.storages
            .values()
            .fold(None, |best: Option<&Storage>, candidate| match best {
                Some(current) if current.free_capacity() >= candidate.free_capacity() => {
                    Some(current)
                }
                _ => Some(candidate),
            })
            .map(|s| s.id().clone())
    }

    fn push_history(&mut self, task: ProductionTask) {
        self.history.push_back(task);
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
    }

    // -----------------------------------------------------------------------
    // Transfer & summary
    // -----------------------------------------------------------------------

    /// Move up to `amount` of `kind` from one storage to another. Whatever
    /// the destination cannot hold goes back to the source. Returns whether
    /// anything moved.
    pub fn transfer(&mut self, from: &str, to: &str, kind: ResourceKind, amount: u32) -> bool {
        if !self.storages.contains_key(to) {
            return false;
        }
        let Some(source) = self.storages.get_mut(from) else {
            return false;
        };
        let removed = source.remove(kind, amount);
        if removed == 0 {
            return false;
        }
        let added = self
            .storages
            .get_mut(to)
            .map_or(0, |dest| dest.add(kind, removed));
        let shortfall = removed.saturating_sub(added);
        if shortfall > 0
            && let Some(source) = self.storages.get_mut(from)
        {
            source.add(kind, shortfall);
        }
        debug!(from, to, resource = kind.name(), moved = added, "Transfer");
        added > 0
    }

    /// Village-wide totals, ordered by category then resource name. Kinds
    /// held nowhere are omitted.
    pub fn summary(&self) -> Vec<ResourceTotal> {
        let mut totals: BTreeMap<ResourceKind, u32> = BTreeMap::new();
        for store in self.storages.values() {
            for (kind, qty) in store.inventory() {
                let entry = totals.entry(*kind).or_insert(0);
                *entry = entry.saturating_add(*qty);
            }
        }
        let mut out: Vec<ResourceTotal> = totals
            .into_iter()
            .filter(|(_, total)| *total > 0)
            .map(|(kind, total)| ResourceTotal {
                kind,
                category: kind.category(),
                total,
            })
            .collect();
        out.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.kind.name().cmp(b.kind.name()))
        });
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn origin() -> Coordinate {
        Coordinate::new(0.0, 0.0)
    }

    fn manager_with_store(capacity: u32) -> ResourceManager {
        let mut mgr = ResourceManager::new();
        mgr.create_storage("granary", "Granary", capacity, origin());
        mgr
    }

    fn agent(name: &str) -> AgentId {
        AgentId::new(name)
    }

    fn granary() -> StorageId {
        StorageId::new("granary")
    }

    #[test]
    fn baker_consumes_then_delivers() {
        let mut mgr = manager_with_store(100);
        mgr.find_mut("granary").unwrap().add(ResourceKind::Food, 5);

        let task = mgr
            .start_production(&agent("Hilda"), "baker", 8, Some(&granary()))
            .unwrap();
        assert_eq!(task.end_hour, 11);
        assert_eq!(mgr.find("granary").unwrap().quantity(ResourceKind::Food), 3);

        assert!(mgr.update_production(10).is_empty());
        assert_eq!(mgr.find("granary").unwrap().quantity(ResourceKind::Food), 3);

        let done = mgr.update_production(11);
        assert_eq!(done.len(), 1);
        let task = done.first().unwrap();
        assert!(task.completed);
        assert_eq!(task.delivered, 10);
        assert_eq!(mgr.find("granary").unwrap().quantity(ResourceKind::Food), 13);
        assert!(mgr.active_task("Hilda").is_none());
    }

    #[test]
    fn missing_input_consumes_nothing() {
        let mut mgr = manager_with_store(100);
        mgr.find_mut("granary").unwrap().add(ResourceKind::Wood, 2);

        let task = mgr.start_production(&agent("Gareth"), "Blacksmith", 8, Some(&granary()));
        assert!(task.is_none());
        assert_eq!(mgr.find("granary").unwrap().quantity(ResourceKind::Wood), 2);
        assert!(mgr.active_task("Gareth").is_none());
    }

    #[test]
    fn inputs_without_storage_are_declined() {
        let mut mgr = manager_with_store(100);
        assert!(mgr.start_production(&agent("Hilda"), "baker", 8, None).is_none());
        let unknown = StorageId::new("cellar");
        assert!(mgr.start_production(&agent("Hilda"), "baker", 8, Some(&unknown)).is_none());
    }

    #[test]
    fn unknown_occupation_yields_none() {
        let mut mgr = manager_with_store(100);
        assert!(mgr.start_production(&agent("Tom"), "jester", 8, None).is_none());
        assert!(mgr.start_production(&agent("Tom"), "guard", 8, None).is_none());
    }

    #[test]
    fn second_start_returns_running_task() {
        let mut mgr = manager_with_store(100);
        let first = mgr
            .start_production(&agent("Ann"), "farmer", 6, Some(&granary()))
            .unwrap();
        let second = mgr
            .start_production(&agent("Ann"), "farmer", 7, Some(&granary()))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(mgr.active_tasks().count(), 1);
    }

    #[test]
    fn task_spanning_midnight_completes_next_day() {
        let mut mgr = manager_with_store(100);
        // Day 0, 22:00 -> four hours later is day 1, 02:00.
        let task = mgr
            .start_production(&agent("Ann"), "farmer", 22, Some(&granary()))
            .unwrap();
        assert_eq!(task.end_hour, 26);
        assert!(mgr.update_production(25).is_empty());
        assert_eq!(mgr.update_production(26).len(), 1);
        assert_eq!(mgr.find("granary").unwrap().quantity(ResourceKind::Food), 4);
    }

    #[test]
    fn full_storage_loses_excess_output() {
        let mut mgr = manager_with_store(10);
        mgr.find_mut("granary").unwrap().add(ResourceKind::Ore, 8);
        mgr.start_production(&agent("Dorn"), "miner", 0, Some(&granary()));
        let done = mgr.update_production(4);
        let task = done.first().unwrap();
        assert_eq!(task.quantity, 3);
        assert_eq!(task.delivered, 2);
        assert_eq!(mgr.find("granary").unwrap().total_stored(), 10);
    }

    #[test]
    fn output_without_storage_goes_to_roomiest() {
        let mut mgr = manager_with_store(10);
        mgr.create_storage("warehouse", "Warehouse", 50, Coordinate::new(5.0, 5.0));
        mgr.start_production(&agent("Ivy"), "herbalist", 0, None);
        mgr.update_production(2);
        assert_eq!(mgr.find("warehouse").unwrap().quantity(ResourceKind::Herbs), 3);
        assert_eq!(mgr.find("granary").unwrap().quantity(ResourceKind::Herbs), 0);
    }

    #[test]
    fn history_is_bounded() {
        let mut mgr = ResourceManager::with_history_limit(3);
        mgr.create_storage("granary", "Granary", 1000, origin());
        for i in 0..5_u64 {
            let name = format!("farmer-{i}");
            mgr.start_production(&agent(&name), "farmer", i, Some(&granary()));
        }
        mgr.update_production(100);
        let kept: Vec<&str> = mgr
            .recent_completions()
            .map(|t| t.agent_id.as_str())
            .collect();
        assert_eq!(kept, vec!["farmer-2", "farmer-3", "farmer-4"]);
    }

    #[test]
    fn transfer_conserves_when_destination_fills() {
        let mut mgr = manager_with_store(100);
        mgr.create_storage("shed", "Shed", 5, origin());
        mgr.find_mut("granary").unwrap().add(ResourceKind::Wood, 20);
        mgr.find_mut("shed").unwrap().add(ResourceKind::Ore, 2);

        let before = mgr.total_of(ResourceKind::Wood);
        assert!(mgr.transfer("granary", "shed", ResourceKind::Wood, 10));
        assert_eq!(mgr.total_of(ResourceKind::Wood), before);
        assert_eq!(mgr.find("shed").unwrap().quantity(ResourceKind::Wood), 3);
        assert_eq!(mgr.find("granary").unwrap().quantity(ResourceKind::Wood), 17);
    }

    #[test]
    fn transfer_into_full_storage_moves_nothing() {
        let mut mgr = manager_with_store(100);
        mgr.create_storage("shed", "Shed", 1, origin());
        mgr.find_mut("shed").unwrap().add(ResourceKind::Ore, 1);
        mgr.find_mut("granary").unwrap().add(ResourceKind::Wood, 4);
        assert!(!mgr.transfer("granary", "shed", ResourceKind::Wood, 4));
        assert_eq!(mgr.find("granary").unwrap().quantity(ResourceKind::Wood), 4);
    }

    #[test]
    fn transfer_with_unknown_storage_is_rejected() {
        let mut mgr = manager_with_store(100);
        mgr.find_mut("granary").unwrap().add(ResourceKind::Wood, 4);
        assert!(!mgr.transfer("granary", "nowhere", ResourceKind::Wood, 4));
        assert!(!mgr.transfer("nowhere", "granary", ResourceKind::Wood, 4));
        assert_eq!(mgr.total_of(ResourceKind::Wood), 4);
    }

    #[test]
    fn summary_sorted_by_category_then_name() {
        let mut mgr = manager_with_store(100);
        let store = mgr.find_mut("granary").unwrap();
        store.add(ResourceKind::Tools, 1);
        store.add(ResourceKind::Wood, 4);
        store.add(ResourceKind::Iron, 2);
        store.add(ResourceKind::Food, 6);
        store.add(ResourceKind::Furniture, 1);

        let order: Vec<ResourceKind> = mgr.summary().into_iter().map(|t| t.kind).collect();
        assert_eq!(
            order,
            vec![
                ResourceKind::Food,
                ResourceKind::Wood,
                ResourceKind::Iron,
                ResourceKind::Furniture,
                ResourceKind::Tools,
            ]
        );
    }

    #[test]
    fn nearest_storage_by_distance() {
        let mut mgr = manager_with_store(10);
        mgr.create_storage("far", "Far Shed", 10, Coordinate::new(90.0, 90.0));
        let near = mgr.nearest_storage(Coordinate::new(80.0, 80.0)).unwrap();
        assert_eq!(near.id().as_str(), "far");
    }
}
