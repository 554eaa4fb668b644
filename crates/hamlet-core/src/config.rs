//! Configuration loading and typed config structures for the Hamlet simulation.
//!
//! The canonical configuration lives in `hamlet-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads it. Every section and key is
//! optional; anything left out takes the default.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use hamlet_agents::NeedsConfig;
use hamlet_economy::DEFAULT_HISTORY_LIMIT;
use hamlet_types::ResourceKind;
use serde::Deserialize;

/// Environment variable overriding `logging.state_file`.
pub const STATE_FILE_ENV: &str = "HAMLET_STATE_FILE";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `hamlet-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, start time, pacing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Need decay magnitudes and decision thresholds.
    #[serde(default)]
    pub needs: NeedsConfig,

    /// Storages and production settings.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Villagers registered at startup.
    #[serde(default = "default_villagers")]
    pub villagers: Vec<VillagerConfig>,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging and state export configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            needs: NeedsConfig::default(),
            economy: EconomyConfig::default(),
            villagers: default_villagers(),
            simulation: SimulationBoundsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `HAMLET_STATE_FILE` overrides `logging.state_file` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable village name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Seed for the registry's emergency-home placement.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Day the clock starts on.
    #[serde(default = "default_start_day")]
    pub start_day: u64,

    /// Hour of day the clock starts at. The first advance moves to the
    /// following hour.
    #[serde(default = "default_start_hour")]
    pub start_hour: u8,

    /// Real-time milliseconds per game hour.
    #[serde(default = "default_hour_interval_ms")]
    pub hour_interval_ms: u64,

    /// Apply activity recovery every N non-checkpoint hours (0 = never).
    #[serde(default = "default_recovery_interval_hours")]
    pub recovery_interval_hours: u8,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            start_day: default_start_day(),
            start_hour: default_start_hour(),
            hour_interval_ms: default_hour_interval_ms(),
            recovery_interval_hours: default_recovery_interval_hours(),
        }
    }
}

/// Economy configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EconomyConfig {
    /// Completed production tasks kept for display.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Only start production for villagers standing at their workplace.
    #[serde(default)]
    pub require_at_workplace: bool,

    /// Storages created at startup.
    #[serde(default = "default_storages")]
    pub storages: Vec<StorageConfig>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            require_at_workplace: false,
            storages: default_storages(),
        }
    }
}

/// One storage to create at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StorageConfig {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Shared capacity across all resources.
    pub capacity: u32,
    /// Map x coordinate.
    #[serde(default)]
    pub x: f64,
    /// Map y coordinate.
    #[serde(default)]
    pub y: f64,
    /// Opening stock (resource -> quantity).
    #[serde(default)]
    pub initial: BTreeMap<ResourceKind, u32>,
}

/// One villager to register at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VillagerConfig {
    /// Unique name.
    pub name: String,
    /// Occupation (free-form; unknown trades get no workplace or recipe).
    pub occupation: String,
    /// Preferred home location ID.
    #[serde(default)]
    pub home: Option<String>,
}

impl VillagerConfig {
    fn new(name: &str, occupation: &str) -> Self {
        Self {
            name: name.to_owned(),
            occupation: occupation.to_owned(),
            home: None,
        }
    }
}

/// Simulation boundary configuration.
///
/// A value of 0 for either field means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of game days before the run ends (0 = unlimited).
    #[serde(default)]
    pub max_days: u64,

    /// Maximum wall-clock seconds before the run ends (0 = unlimited).
    #[serde(default)]
    pub max_real_time_seconds: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,

    /// Where to write the world state JSON at each checkpoint.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Override the state file path from the environment when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(STATE_FILE_ENV)
            && !val.is_empty()
        {
            self.state_file = Some(PathBuf::from(val));
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            state_file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Hamlet".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_start_day() -> u64 {
    1
}

const fn default_start_hour() -> u8 {
    5
}

const fn default_hour_interval_ms() -> u64 {
    1000
}

const fn default_recovery_interval_hours() -> u8 {
    2
}

const fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_storages() -> Vec<StorageConfig> {
    vec![
        StorageConfig {
            id: "granary".to_owned(),
            name: "Granary".to_owned(),
            capacity: 200,
            x: 48.0,
            y: 44.0,
            initial: BTreeMap::from([(ResourceKind::Food, 40)]),
        },
        StorageConfig {
            id: "warehouse".to_owned(),
            name: "Warehouse".to_owned(),
            capacity: 300,
            x: 60.0,
            y: 38.0,
            initial: BTreeMap::from([
                (ResourceKind::Wood, 10),
                (ResourceKind::Ore, 6),
                (ResourceKind::Herbs, 4),
            ]),
        },
    ]
}

fn default_villagers() -> Vec<VillagerConfig> {
    vec![
        VillagerConfig::new("Ann", "farmer"),
        VillagerConfig::new("Hilda", "baker"),
        VillagerConfig::new("Wulf", "woodcutter"),
        VillagerConfig::new("Dorn", "miner"),
        VillagerConfig::new("Osric", "smelter"),
        VillagerConfig::new("Gareth", "blacksmith"),
        VillagerConfig::new("Edda", "carpenter"),
        VillagerConfig::new("Ivy", "herbalist"),
        VillagerConfig::new("Maud", "healer"),
        VillagerConfig::new("Bertram", "merchant"),
        VillagerConfig::new("Rosa", "innkeeper"),
        VillagerConfig::new("Tom", "guard"),
    ]
}
