//! Tunables for need decay and the decision rules.
//!
//! [`NeedsConfig`] bundles every threshold and decay magnitude so the
//! scheduler and tests can override the defaults. It is read from the
//! `needs` section of `hamlet-config.yaml`; any key left out keeps its
//! default.

use serde::{Deserialize, Serialize};

/// Configuration for need decay and decision thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    /// Food lost per checkpoint (default: 8).
    pub food_decay: u32,
    /// Safety lost per checkpoint (default: 2).
    pub safety_decay: u32,
    /// Wealth lost per checkpoint (default: 5).
    pub wealth_decay: u32,
    /// Social lost per checkpoint (default: 6).
    pub social_decay: u32,
    /// Rest lost per checkpoint (default: 10).
    pub rest_decay: u32,

    /// Safety below which an agent flees, overriding every other rule
    /// (default: 20). Also the critical level flagged by the safety scan.
    pub flee_below: u32,
    /// Safety below which socializing happens at home (default: 40).
    pub nervous_below: u32,
    /// Food below which eating takes fixed priority 90 (default: 25).
    pub starving_below: u32,
    /// Food below which eating becomes a candidate (default: 50).
    pub hungry_below: u32,
    /// Wealth below which working becomes a candidate (default: 40).
    pub work_below: u32,
    /// Social below which socializing becomes a candidate (default: 30).
    pub lonely_below: u32,
    /// Rest below which resting becomes a candidate, and at night takes
    /// fixed priority 80 (default: 25).
    pub tired_below: u32,

    /// First hour of the night (default: 22).
    pub night_start_hour: u8,
    /// First hour of the morning (default: 6).
    pub night_end_hour: u8,

    /// Safety restored by the administrative restore hook (default: 50).
    pub restore_safety_amount: u32,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            food_decay: 8,
            safety_decay: 2,
            wealth_decay: 5,
            social_decay: 6,
            rest_decay: 10,
            flee_below: 20,
            nervous_below: 40,
            starving_below: 25,
            hungry_below: 50,
            work_below: 40,
            lonely_below: 30,
            tired_below: 25,
            night_start_hour: 22,
            night_end_hour: 6,
            restore_safety_amount: 50,
        }
    }
}

impl NeedsConfig {
    /// Whether `hour` falls in the night window.
    pub const fn is_night(&self, hour: u8) -> bool {
        hour >= self.night_start_hour || hour < self.night_end_hour
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn night_window_wraps_midnight() {
        let config = NeedsConfig::default();
        assert!(config.is_night(22));
        assert!(config.is_night(23));
        assert!(config.is_night(0));
        assert!(config.is_night(5));
        assert!(!config.is_night(6));
        assert!(!config.is_night(21));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: NeedsConfig = serde_yml::from_str("food_decay: 12\nflee_below: 25\n").unwrap();
        assert_eq!(config.food_decay, 12);
        assert_eq!(config.flee_below, 25);
        assert_eq!(config.rest_decay, 10);
        assert_eq!(config.night_start_hour, 22);
    }
}
