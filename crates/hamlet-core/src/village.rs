//! The village: clock, scheduler, and economy driven one hour at a time.
//!
//! [`Village::advance_hour`] is the single writer. Each call runs to
//! completion in this order:
//!
//! 1. **Clock** -- advance one hour.
//! 2. **Checkpoint** -- on checkpoint hours, run the daily pipeline.
//! 3. **Recovery** -- on other hours, apply activity recovery every
//!    `recovery_interval_hours` hours.
//! 4. **Production update** -- complete due tasks and deliver output.
//! 5. **Production start** -- working villagers start their trade's recipe
//!    at the storage nearest their workplace.
//!
//! Observers read a [`WorldSnapshot`] between hours.

use hamlet_agents::NeedsConfig;
use hamlet_economy::ResourceManager;
use hamlet_types::{
    Activity, AgentId, AgentProfile, Coordinate, ProductionTask, StorageId, ThreatSeverity,
};
use hamlet_world::{LocationRegistry, WorldError, create_starting_village};
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{ClockError, GameClock};
use crate::config::SimulationConfig;
use crate::scheduler::{CheckpointReport, DailyScheduler};
use crate::snapshot::WorldSnapshot;

/// Errors that can occur while building or advancing the village.
#[derive(Debug, thiserror::Error)]
pub enum VillageError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The location catalog was invalid.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Production settings for the hour driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductionRules {
    /// Apply recovery every N non-checkpoint hours (0 = never).
    pub recovery_interval_hours: u8,
    /// Only start production for villagers standing at their workplace.
    pub require_at_workplace: bool,
}

impl Default for ProductionRules {
    fn default() -> Self {
        Self {
            recovery_interval_hours: 2,
            require_at_workplace: false,
        }
    }
}

/// Summary of a single hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourSummary {
    /// Day after advancing.
    pub day: u64,
    /// Hour after advancing.
    pub hour: u8,
    /// Absolute hour after advancing.
    pub absolute_hour: u64,
    /// The checkpoint report, when this hour was a checkpoint.
    pub checkpoint: Option<CheckpointReport>,
    /// Whether activity recovery was applied.
    pub recovered: bool,
    /// Tasks completed this hour.
    pub completed: Vec<ProductionTask>,
    /// Tasks started this hour.
    pub started: Vec<ProductionTask>,
}

/// The whole simulated village.
#[derive(Debug, Clone)]
pub struct Village {
    /// Display name.
    name: String,
    /// Day and hour.
    clock: GameClock,
    /// Villagers and places.
    scheduler: DailyScheduler,
    /// Storages and production.
    economy: ResourceManager,
    /// Recovery and production settings.
    rules: ProductionRules,
    /// Non-checkpoint hours since the last recovery tick.
    hours_since_recovery: u8,
}

impl Village {
    /// Assemble a village from its parts.
    pub fn new(
        name: impl Into<String>,
        clock: GameClock,
        scheduler: DailyScheduler,
        economy: ResourceManager,
        rules: ProductionRules,
    ) -> Self {
        Self {
            name: name.into(),
            clock,
            scheduler,
            economy,
            rules,
            hours_since_recovery: 0,
        }
    }

    /// Build the default starting village with the configured storages and
    /// villagers.
    ///
    /// # Errors
    ///
    /// Returns [`VillageError`] if the start time is invalid or the
    /// catalog fails validation.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, VillageError> {
        let registry = create_starting_village(config.world.seed)?;
        Self::with_registry(config, registry)
    }

    /// Build a village on a caller-supplied registry.
    ///
    /// # Errors
    ///
    /// Returns [`VillageError::Clock`] if the start hour is invalid.
    pub fn with_registry(
        config: &SimulationConfig,
        registry: LocationRegistry,
    ) -> Result<Self, VillageError> {
        let clock = GameClock::new(config.world.start_day, config.world.start_hour)?;
        let mut scheduler = DailyScheduler::new(registry, config.needs.clone());

        let mut economy = ResourceManager::with_history_limit(config.economy.history_limit);
        for storage in &config.economy.storages {
            economy.create_storage(
                storage.id.as_str(),
                storage.name.as_str(),
                storage.capacity,
                Coordinate::new(storage.x, storage.y),
            );
            if let Some(store) = economy.find_mut(&storage.id) {
                for (kind, qty) in &storage.initial {
                    store.add(*kind, *qty);
                }
            }
        }

        for villager in &config.villagers {
            let mut profile = AgentProfile::new(villager.name.as_str(), villager.occupation.as_str());
            if let Some(home) = &villager.home {
                profile = profile.with_home(home.as_str());
            }
            scheduler.register_agent(profile);
        }

        info!(
            village = config.world.name.as_str(),
            agents = scheduler.agent_count(),
            storages = config.economy.storages.len(),
            day = clock.day(),
            hour = clock.hour(),
            "Village bootstrapped"
        );

        Ok(Self::new(
            config.world.name.as_str(),
            clock,
            scheduler,
            economy,
            ProductionRules {
                recovery_interval_hours: config.world.recovery_interval_hours,
                require_at_workplace: config.economy.require_at_workplace,
            },
        ))
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The game clock.
    pub const fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Villagers and places.
    pub const fn scheduler(&self) -> &DailyScheduler {
        &self.scheduler
    }

    /// Mutable access for registration and administrative hooks.
    pub const fn scheduler_mut(&mut self) -> &mut DailyScheduler {
        &mut self.scheduler
    }

    /// Storages and production.
    pub const fn economy(&self) -> &ResourceManager {
        &self.economy
    }

    /// Mutable access for deposits and transfers.
    pub const fn economy_mut(&mut self) -> &mut ResourceManager {
        &mut self.economy
    }

    /// The needs configuration in force.
    pub const fn needs_config(&self) -> &NeedsConfig {
        self.scheduler.config()
    }

    /// Drop every villager's safety.
    pub fn trigger_threat(&mut self, severity: ThreatSeverity) {
        self.scheduler.trigger_threat(severity);
    }

    /// Raise every villager's safety.
    pub fn restore_safety(&mut self, amount: u32) {
        self.scheduler.restore_safety(amount);
    }

    /// Capture a read-only view of the current state.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self)
    }

    /// Advance one game hour.
    ///
    /// # Errors
    ///
    /// Returns [`VillageError::Clock`] if the day counter overflows.
    pub fn advance_hour(&mut self) -> Result<HourSummary, VillageError> {
        // 1. Clock
        let (day, hour) = self.clock.advance()?;
        let absolute_hour = self.clock.absolute_hour();
        debug!(day, hour, absolute_hour, "Hour started");

        // 2. Checkpoint / 3. Recovery
        let checkpoint = self.scheduler.on_hour_change(hour);
        let recovered = if checkpoint.is_some() {
            self.hours_since_recovery = 0;
            false
        } else {
            self.tick_recovery()
        };

        // 4. Production update
        let completed = self.economy.update_production(absolute_hour);

        // 5. Production start
        let started = self.start_production(absolute_hour);

        Ok(HourSummary {
            day,
            hour,
            absolute_hour,
            checkpoint,
            recovered,
            completed,
            started,
        })
    }

    /// Count a non-checkpoint hour and recover when the interval elapses.
    fn tick_recovery(&mut self) -> bool {
        if self.rules.recovery_interval_hours == 0 {
            return false;
        }
        self.hours_since_recovery = self.hours_since_recovery.saturating_add(1);
        if self.hours_since_recovery < self.rules.recovery_interval_hours {
            return false;
        }
        self.hours_since_recovery = 0;
        self.scheduler.update_needs();
        true
    }

    /// Start production for every working villager without a running task.
    fn start_production(&mut self, absolute_hour: u64) -> Vec<ProductionTask> {
        let candidates: Vec<(AgentId, String, Option<StorageId>)> = self
            .scheduler
            .agents()
            .filter(|agent| agent.activity == Activity::Working)
            .filter(|agent| self.economy.active_task(agent.id.as_str()).is_none())
            .filter(|agent| {
                !self.rules.require_at_workplace
                    || agent.workplace.as_ref() == Some(&agent.location)
            })
            .map(|agent| {
                let site = agent.workplace.as_ref().unwrap_or(&agent.location);
                let storage = self
                    .scheduler
                    .registry()
                    .find(site.as_str())
                    .and_then(|loc| self.economy.nearest_storage(loc.coordinate))
                    .map(|store| store.id().clone());
                (agent.id.clone(), agent.occupation.clone(), storage)
            })
            .collect();

        candidates
            .into_iter()
            .filter_map(|(agent, occupation, storage)| {
                self.economy
                    .start_production(&agent, &occupation, absolute_hour, storage.as_ref())
            })
            .collect()
    }
}
