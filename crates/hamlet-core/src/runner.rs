//! Hour loop runner with operator controls.
//!
//! This module provides [`run_village`], the top-level async function
//! that drives [`Village::advance_hour`] with support for:
//!
//! - **Bounded runs**: stop after `max_days` or `max_real_time_seconds`
//! - **Pause/resume**: a paused loop waits between hours until released
//! - **Variable speed**: the hour interval is re-read before every sleep
//! - **Queued commands**: threats and safety restores land at the start
//!   of the next hour
//! - **Clean stop**: an operator stop ends the loop between hours

use std::sync::Arc;

use tracing::{info, warn};

use crate::operator::{OperatorCommand, OperatorState, SimulationEndReason};
use crate::village::{HourSummary, Village, VillageError};

/// Errors that can occur during the run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Advancing the village failed.
    #[error("village error: {source}")]
    Village {
        /// The underlying village error.
        #[from]
        source: VillageError,
    },
}

/// Result of a run.
#[derive(Debug)]
pub struct RunResult {
    /// The reason the run ended.
    pub end_reason: SimulationEndReason,
    /// The last hour summary, if any hour completed.
    pub final_summary: Option<HourSummary>,
    /// Total number of hours executed.
    pub total_hours: u64,
}

/// Callback invoked after each hour completes.
///
/// Implementations can write snapshots, forward summaries to a UI, and
/// so on.
pub trait HourCallback: Send {
    /// Called after an hour completes successfully.
    fn on_hour(&mut self, summary: &HourSummary, village: &Village);
}

/// A no-op hour callback.
pub struct NoOpCallback;

impl HourCallback for NoOpCallback {
    fn on_hour(&mut self, _summary: &HourSummary, _village: &Village) {}
}

/// Apply queued operator commands to the village.
async fn apply_commands(village: &mut Village, operator: &OperatorState) {
    for command in operator.drain_commands().await {
        info!(?command, "Applying operator command");
        match command {
            OperatorCommand::Threat(severity) => village.trigger_threat(severity),
            OperatorCommand::RestoreSafety(amount) => village.restore_safety(amount),
        }
    }
}

/// Run the hour loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if an hour fails to advance.
pub async fn run_village(
    village: &mut Village,
    operator: &Arc<OperatorState>,
    callback: &mut dyn HourCallback,
) -> Result<RunResult, RunnerError> {
    let mut last_summary: Option<HourSummary> = None;
    let mut total_hours: u64 = 0;
    let start_day = village.clock().day();

    info!(
        village = village.name(),
        max_days = operator.max_days(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        hour_interval_ms = operator.hour_interval_ms(),
        "Simulation starting"
    );

    loop {
        // --- Check pause ---
        if operator.is_paused() {
            info!("Simulation paused, waiting for resume...");
            operator.wait_if_paused().await;
            info!("Simulation resumed");
        }

        // --- Check stop request (before hour) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            return finish(operator, SimulationEndReason::OperatorStop, last_summary, total_hours)
                .await;
        }

        // --- Check time limit (before hour) ---
        if operator.time_limit_reached() {
            info!(
                max_seconds = operator.max_real_time_seconds(),
                elapsed = operator.elapsed_seconds(),
                "Real-time limit reached"
            );
            return finish(
                operator,
                SimulationEndReason::MaxRealTimeReached,
                last_summary,
                total_hours,
            )
            .await;
        }

        // --- Execute hour ---
        apply_commands(village, operator).await;
        let summary = village.advance_hour()?;
        total_hours = total_hours.saturating_add(1);

        callback.on_hour(&summary, village);

        // --- Check day limit (after hour) ---
        let days_elapsed = summary.day.saturating_sub(start_day);
        let day_done = operator.day_limit_reached(days_elapsed);
        last_summary = Some(summary);
        if day_done {
            info!(days_elapsed, max_days = operator.max_days(), "Day limit reached");
            return finish(
                operator,
                SimulationEndReason::MaxDaysReached,
                last_summary,
                total_hours,
            )
            .await;
        }

        // --- Sleep for hour interval ---
        let interval_ms = operator.hour_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        }
    }
}

async fn finish(
    operator: &OperatorState,
    reason: SimulationEndReason,
    final_summary: Option<HourSummary>,
    total_hours: u64,
) -> Result<RunResult, RunnerError> {
    operator.set_end_reason(reason).await;
    Ok(RunResult {
        end_reason: reason,
        final_summary,
        total_hours,
    })
}

/// Log the end of a run.
pub fn log_run_end(result: &RunResult) {
    info!(
        reason = ?result.end_reason,
        total_hours = result.total_hours,
        final_day = result.final_summary.as_ref().map(|s| s.day),
        final_hour = result.final_summary.as_ref().map(|s| s.hour),
        "Simulation ended"
    );
    if result.final_summary.is_none() {
        warn!("Simulation ended with no hours executed");
    }
}
