//! Need mechanics: checkpoint decay, activity recovery, and threat effects.
//!
//! These are the only functions that change a villager's [`Needs`]. The
//! scheduler decides when to call them; it never computes deltas itself.
//! Every result is clamped to `0..=NEED_MAX`.

use hamlet_types::{Activity, NEED_MAX, Needs, ThreatSeverity};

use crate::config::NeedsConfig;

/// Signed per-need change applied by one recovery tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeedsDelta {
    /// Food change.
    pub food: i32,
    /// Safety change.
    pub safety: i32,
    /// Wealth change.
    pub wealth: i32,
    /// Social change.
    pub social: i32,
    /// Rest change.
    pub rest: i32,
}

/// Apply a signed change to one need and clamp.
fn adjust(value: u32, delta: i32) -> u32 {
    value.saturating_add_signed(delta).min(NEED_MAX)
}

/// Apply one checkpoint's decay to every need. Needs floor at zero.
pub fn apply_decay(needs: &mut Needs, config: &NeedsConfig) {
    needs.food = needs.food.saturating_sub(config.food_decay);
    needs.safety = needs.safety.saturating_sub(config.safety_decay);
    needs.wealth = needs.wealth.saturating_sub(config.wealth_decay);
    needs.social = needs.social.saturating_sub(config.social_decay);
    needs.rest = needs.rest.saturating_sub(config.rest_decay);
}

/// The recovery an activity yields per tick.
///
/// Fleeing costs safety rather than restoring it: the agent stays
/// frightened until a later checkpoint finds it out of danger.
pub const fn recovery_delta(activity: Activity) -> NeedsDelta {
    let zero = NeedsDelta {
        food: 0,
        safety: 0,
        wealth: 0,
        social: 0,
        rest: 0,
    };
    match activity {
        Activity::Working => NeedsDelta {
            wealth: 15,
            rest: -5,
            ..zero
        },
        Activity::Eating => NeedsDelta {
            food: 30,
            social: 5,
            ..zero
        },
        Activity::Socializing => NeedsDelta {
            social: 20,
            food: -3,
            ..zero
        },
        Activity::Resting => NeedsDelta {
            rest: 40,
            food: -5,
            ..zero
        },
        Activity::Fleeing => NeedsDelta {
            safety: -10,
            ..zero
        },
        Activity::Idle => NeedsDelta {
            rest: 10,
            social: -2,
            ..zero
        },
    }
}

/// Apply one recovery tick for the agent's current activity.
pub fn apply_recovery(needs: &mut Needs, activity: Activity) {
    let delta = recovery_delta(activity);
    needs.food = adjust(needs.food, delta.food);
    needs.safety = adjust(needs.safety, delta.safety);
    needs.wealth = adjust(needs.wealth, delta.wealth);
    needs.social = adjust(needs.social, delta.social);
    needs.rest = adjust(needs.rest, delta.rest);
}

/// Drop safety by the severity's fixed amount.
pub const fn apply_threat(needs: &mut Needs, severity: ThreatSeverity) {
    needs.safety = needs.safety.saturating_sub(severity.safety_drop());
}

/// Raise safety by `amount`, capped at the maximum.
pub fn restore_safety(needs: &mut Needs, amount: u32) {
    needs.safety = needs.safety.saturating_add(amount).min(NEED_MAX);
}

/// Whether safety sits below the flee threshold.
pub const fn is_critical(needs: &Needs, config: &NeedsConfig) -> bool {
    needs.safety < config.flee_below
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_floors_at_zero() {
        let mut needs = Needs::new(5, 1, 100, 3, 10);
        apply_decay(&mut needs, &NeedsConfig::default());
        assert_eq!(needs, Needs::new(0, 0, 95, 0, 0));
    }

    #[test]
    fn decay_default_magnitudes() {
        let mut needs = Needs::new(50, 50, 50, 50, 50);
        apply_decay(&mut needs, &NeedsConfig::default());
        assert_eq!(needs, Needs::new(42, 48, 45, 44, 40));
    }

    #[test]
    fn recovery_clamps_high_and_low() {
        let mut needs = Needs::new(2, 50, 95, 50, 70);
        apply_recovery(&mut needs, Activity::Working);
        assert_eq!(needs.wealth, 100);
        assert_eq!(needs.rest, 65);

        apply_recovery(&mut needs, Activity::Resting);
        assert_eq!(needs.rest, 100);
        assert_eq!(needs.food, 0);
    }

    #[test]
    fn recovery_table_matches_activities() {
        let base = Needs::new(50, 50, 50, 50, 50);
        let cases = [
            (Activity::Working, Needs::new(50, 50, 65, 50, 45)),
            (Activity::Eating, Needs::new(80, 50, 50, 55, 50)),
            (Activity::Socializing, Needs::new(47, 50, 50, 70, 50)),
            (Activity::Resting, Needs::new(45, 50, 50, 50, 90)),
            (Activity::Fleeing, Needs::new(50, 40, 50, 50, 50)),
            (Activity::Idle, Needs::new(50, 50, 50, 48, 60)),
        ];
        for (activity, expected) in cases {
            let mut needs = base;
            apply_recovery(&mut needs, activity);
            assert_eq!(needs, expected, "{activity:?}");
        }
    }

    #[test]
    fn threat_tiers() {
        for (severity, expected) in [
            (ThreatSeverity::Minor, 70),
            (ThreatSeverity::Major, 50),
            (ThreatSeverity::Critical, 20),
        ] {
            let mut needs = Needs::new(50, 90, 50, 50, 50);
            apply_threat(&mut needs, severity);
            assert_eq!(needs.safety, expected);
        }

        let mut needs = Needs::new(50, 10, 50, 50, 50);
        apply_threat(&mut needs, ThreatSeverity::Critical);
        assert_eq!(needs.safety, 0);
    }

    #[test]
    fn restore_caps_at_max() {
        let mut needs = Needs::new(50, 70, 50, 50, 50);
        restore_safety(&mut needs, 50);
        assert_eq!(needs.safety, 100);
    }

    #[test]
    fn critical_below_flee_threshold() {
        let config = NeedsConfig::default();
        assert!(is_critical(&Needs::new(50, 19, 50, 50, 50), &config));
        assert!(!is_critical(&Needs::new(50, 20, 50, 50, 50), &config));
    }
}
