//! Game clock for the Hamlet simulation.
//!
//! The clock counts days (starting at 1) and the hour of the day. All
//! derived time values come from these two counters:
//!
//! - [`GameClock::absolute_hour`] is `day * 24 + hour`. The economy keys
//!   production on it so a task started late in the evening completes
//!   after midnight instead of never.
//! - [`GameClock::checkpoint`] maps the hour onto the four daily
//!   checkpoints.

use hamlet_types::Checkpoint;

/// Hours in one game day.
pub const HOURS_PER_DAY: u8 = 24;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The hour of day is outside `0..24`.
    #[error("invalid hour {hour}: must be between 0 and 23")]
    InvalidHour {
        /// The rejected hour.
        hour: u8,
    },

    /// The day counter would overflow.
    #[error("day counter overflow: cannot advance beyond u64::MAX")]
    DayOverflow,
}

/// Day and hour of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameClock {
    /// Current day, starting at 1.
    day: u64,
    /// Hour of the current day, `0..24`.
    hour: u8,
}

impl GameClock {
    /// Create a clock at the given day and hour.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidHour`] if `hour` is 24 or more.
    pub const fn new(day: u64, hour: u8) -> Result<Self, ClockError> {
        if hour >= HOURS_PER_DAY {
            return Err(ClockError::InvalidHour { hour });
        }
        Ok(Self { day, hour })
    }

    /// Advance by one hour, rolling into the next day after 23:00.
    /// Returns the new `(day, hour)`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::DayOverflow`] if the day counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<(u64, u8), ClockError> {
        let next = self.hour.saturating_add(1);
        if next >= HOURS_PER_DAY {
            self.day = self.day.checked_add(1).ok_or(ClockError::DayOverflow)?;
            self.hour = 0;
        } else {
            self.hour = next;
        }
        Ok((self.day, self.hour))
    }

    /// Current day.
    pub const fn day(&self) -> u64 {
        self.day
    }

    /// Current hour of day.
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Hours since day 0, hour 0.
    pub fn absolute_hour(&self) -> u64 {
        self.day
            .saturating_mul(u64::from(HOURS_PER_DAY))
            .saturating_add(u64::from(self.hour))
    }

    /// The checkpoint at the current hour, if any.
    pub fn checkpoint(&self) -> Option<Checkpoint> {
        Checkpoint::at_hour(self.hour)
    }

    /// Render as `Day N, HH:00`.
    pub fn label(&self) -> String {
        format!("Day {}, {:02}:00", self.day, self.hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_hour_24() {
        assert!(GameClock::new(1, 24).is_err());
        assert!(GameClock::new(1, 23).is_ok());
    }

    #[test]
    fn advance_rolls_over_midnight() {
        let clock = GameClock::new(1, 22);
        assert!(clock.is_ok());
        let Ok(mut clock) = clock else { return };
        assert_eq!(clock.advance().ok(), Some((1, 23)));
        assert_eq!(clock.advance().ok(), Some((2, 0)));
        assert_eq!(clock.absolute_hour(), 48);
    }

    #[test]
    fn absolute_hour_monotonic_across_days() {
        let Ok(mut clock) = GameClock::new(1, 0) else {
            return;
        };
        let mut last = clock.absolute_hour();
        for _ in 0..100 {
            assert!(clock.advance().is_ok());
            let now = clock.absolute_hour();
            assert_eq!(now, last.saturating_add(1));
            last = now;
        }
    }

    #[test]
    fn day_overflow_is_an_error() {
        let Ok(mut clock) = GameClock::new(u64::MAX, 23) else {
            return;
        };
        assert!(matches!(clock.advance(), Err(ClockError::DayOverflow)));
    }

    #[test]
    fn checkpoint_lookup() {
        let Ok(clock) = GameClock::new(3, 18) else {
            return;
        };
        assert_eq!(clock.checkpoint(), Some(Checkpoint::Evening));
        assert_eq!(clock.label(), "Day 3, 18:00");
    }
}
