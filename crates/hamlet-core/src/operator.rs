//! Runtime controls shared between the hour loop and the operator.
//!
//! [`OperatorState`] lives behind an [`Arc`](std::sync::Arc). The hour
//! loop reads it between hours; the operator console writes to it from
//! its own task. Flags and the hour interval are atomics so neither side
//! takes a lock on the hot path. Village commands queue behind a tokio
//! mutex and are applied at the start of the next hour.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use hamlet_types::ThreatSeverity;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

use crate::config::SimulationBoundsConfig;

/// Smallest accepted hour interval in milliseconds.
pub const MIN_HOUR_INTERVAL_MS: u64 = 10;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// The configured number of days has passed.
    MaxDaysReached,
    /// The configured wall-clock budget is spent.
    MaxRealTimeReached,
    /// The operator asked to stop.
    OperatorStop,
}

/// A change to the village applied at the start of the next hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OperatorCommand {
    /// Drop every villager's safety.
    Threat(ThreatSeverity),
    /// Raise every villager's safety by the given amount.
    RestoreSafety(u32),
}

/// Point-in-time view of the operator controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorStatus {
    /// Whether the loop is held between hours.
    pub paused: bool,
    /// Whether a stop has been requested.
    pub stop_requested: bool,
    /// Current real-time milliseconds per game hour.
    pub hour_interval_ms: u64,
    /// Wall-clock start of the run, RFC 3339.
    pub started_at: String,
    /// Wall-clock seconds since the start.
    pub elapsed_seconds: u64,
    /// Day limit (0 = unlimited).
    pub max_days: u64,
    /// Wall-clock limit in seconds (0 = unlimited).
    pub max_real_time_seconds: u64,
    /// Village commands waiting for the next hour.
    pub pending_commands: usize,
    /// Why the run ended, once it has.
    pub end_reason: Option<SimulationEndReason>,
}

/// Shared control state for one run.
#[derive(Debug)]
pub struct OperatorState {
    paused: AtomicBool,
    /// Wakes a paused loop.
    resumed: Notify,
    stop_requested: AtomicBool,
    hour_interval_ms: AtomicU64,
    started_at: DateTime<Utc>,
    /// 0 = unlimited.
    max_days: u64,
    /// 0 = unlimited.
    max_real_time_seconds: u64,
    commands: Mutex<Vec<OperatorCommand>>,
    end_reason: Mutex<Option<SimulationEndReason>>,
}

impl OperatorState {
    /// Controls for a run starting now.
    pub fn new(hour_interval_ms: u64, bounds: &SimulationBoundsConfig) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resumed: Notify::new(),
            stop_requested: AtomicBool::new(false),
            hour_interval_ms: AtomicU64::new(hour_interval_ms),
            started_at: Utc::now(),
            max_days: bounds.max_days,
            max_real_time_seconds: bounds.max_real_time_seconds,
            commands: Mutex::new(Vec::new()),
            end_reason: Mutex::new(None),
        }
    }

    /// Whether the loop is held between hours.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Hold the loop before its next hour. Returns `false` if it was
    /// already paused.
    pub fn pause(&self) -> bool {
        !self.paused.swap(true, Ordering::AcqRel)
    }

    /// Release a paused loop. Returns `false` if it was not paused.
    pub fn resume(&self) -> bool {
        let was_paused = self.paused.swap(false, Ordering::AcqRel);
        // notify_one stores a permit, so a resume that lands before the
        // loop starts waiting is not lost.
        self.resumed.notify_one();
        was_paused
    }

    /// Block until the loop is released.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() {
            self.resumed.notified().await;
        }
    }

    /// Ask the loop to end before its next hour. Also releases a pause.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.resume();
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Record why the run ended.
    pub async fn set_end_reason(&self, reason: SimulationEndReason) {
        *self.end_reason.lock().await = Some(reason);
    }

    /// Why the run ended, once it has.
    pub async fn end_reason(&self) -> Option<SimulationEndReason> {
        *self.end_reason.lock().await
    }

    /// Real-time milliseconds per game hour.
    pub fn hour_interval_ms(&self) -> u64 {
        self.hour_interval_ms.load(Ordering::Acquire)
    }

    /// Change the pace. Values below [`MIN_HOUR_INTERVAL_MS`] are refused
    /// with `None`; otherwise the previous interval is returned.
    pub fn set_hour_interval_ms(&self, ms: u64) -> Option<u64> {
        (ms >= MIN_HOUR_INTERVAL_MS).then(|| self.hour_interval_ms.swap(ms, Ordering::AcqRel))
    }

    /// Whether `days_elapsed` reaches the day limit.
    pub const fn day_limit_reached(&self, days_elapsed: u64) -> bool {
        self.max_days > 0 && days_elapsed >= self.max_days
    }

    /// Whether the wall-clock budget is spent.
    pub fn time_limit_reached(&self) -> bool {
        self.max_real_time_seconds > 0 && self.elapsed_seconds() >= self.max_real_time_seconds
    }

    /// Wall-clock seconds since the run started. A clock stepping
    /// backwards reads as zero.
    pub fn elapsed_seconds(&self) -> u64 {
        let secs = Utc::now().signed_duration_since(self.started_at).num_seconds();
        u64::try_from(secs).unwrap_or(0)
    }

    /// Day limit (0 = unlimited).
    pub const fn max_days(&self) -> u64 {
        self.max_days
    }

    /// Wall-clock limit in seconds (0 = unlimited).
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.max_real_time_seconds
    }

    /// Queue a village command for the next hour.
    pub async fn queue_command(&self, command: OperatorCommand) {
        self.commands.lock().await.push(command);
    }

    /// Take every queued command, oldest first.
    pub async fn drain_commands(&self) -> Vec<OperatorCommand> {
        std::mem::take(&mut *self.commands.lock().await)
    }

    /// Snapshot of the controls for display.
    pub async fn status(&self) -> OperatorStatus {
        let pending_commands = self.commands.lock().await.len();
        OperatorStatus {
            paused: self.is_paused(),
            stop_requested: self.is_stop_requested(),
            hour_interval_ms: self.hour_interval_ms(),
            started_at: self.started_at.to_rfc3339(),
            elapsed_seconds: self.elapsed_seconds(),
            max_days: self.max_days,
            max_real_time_seconds: self.max_real_time_seconds,
            pending_commands,
            end_reason: self.end_reason().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> OperatorState {
        OperatorState::new(1000, &SimulationBoundsConfig::default())
    }

    #[test]
    fn starts_running() {
        let op = controls();
        assert!(!op.is_paused());
        assert!(!op.is_stop_requested());
    }

    #[test]
    fn pause_and_resume_report_transitions() {
        let op = controls();
        assert!(op.pause());
        assert!(!op.pause());
        assert!(op.is_paused());
        assert!(op.resume());
        assert!(!op.resume());
        assert!(!op.is_paused());
    }

    #[test]
    fn stop_releases_pause() {
        let op = controls();
        op.pause();
        op.request_stop();
        assert!(op.is_stop_requested());
        assert!(!op.is_paused());
    }

    #[test]
    fn hour_interval_has_a_floor() {
        let op = controls();
        assert_eq!(op.set_hour_interval_ms(250), Some(1000));
        assert_eq!(op.hour_interval_ms(), 250);
        assert_eq!(op.set_hour_interval_ms(5), None);
        assert_eq!(op.hour_interval_ms(), 250);
    }

    #[test]
    fn day_limit_zero_is_unlimited() {
        let bounded = OperatorState::new(
            0,
            &SimulationBoundsConfig {
                max_days: 3,
                max_real_time_seconds: 0,
            },
        );
        assert!(!bounded.day_limit_reached(2));
        assert!(bounded.day_limit_reached(3));
        assert!(!controls().day_limit_reached(999));
        assert!(!controls().time_limit_reached());
    }

    #[tokio::test]
    async fn commands_drain_in_order() {
        let op = controls();
        op.queue_command(OperatorCommand::Threat(ThreatSeverity::Major)).await;
        op.queue_command(OperatorCommand::RestoreSafety(50)).await;
        assert_eq!(
            op.drain_commands().await,
            vec![
                OperatorCommand::Threat(ThreatSeverity::Major),
                OperatorCommand::RestoreSafety(50),
            ]
        );
        assert!(op.drain_commands().await.is_empty());
    }

    #[tokio::test]
    async fn status_reflects_controls() {
        let op = controls();
        op.pause();
        op.set_hour_interval_ms(40);
        op.queue_command(OperatorCommand::RestoreSafety(10)).await;

        let status = op.status().await;
        assert!(status.paused);
        assert_eq!(status.hour_interval_ms, 40);
        assert_eq!(status.pending_commands, 1);
        assert_eq!(status.end_reason, None);
        assert!(!status.started_at.is_empty());
    }

    #[test]
    fn command_json_shape() {
        let json = serde_json::to_string(&OperatorCommand::Threat(ThreatSeverity::Critical));
        assert_eq!(
            json.ok().as_deref(),
            Some(r#"{"type":"threat","value":"critical"}"#)
        );
    }
}
