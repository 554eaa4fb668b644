//! Line-based operator console on stdin.
//!
//! Each line is one command:
//!
//! | Line                | Effect                                        |
//! |---------------------|-----------------------------------------------|
//! | `pause` / `resume`  | Hold or release the hour loop                 |
//! | `speed <ms>`        | Change real-time milliseconds per game hour   |
//! | `threat <severity>` | Queue a `minor`, `major` or `critical` threat |
//! | `restore [amount]`  | Queue a safety restore (default from config)  |
//! | `status`            | Log the operator status                       |
//! | `stop`              | End the run before the next hour              |
//!
//! Village commands are applied at the start of the next hour; the rest
//! act on [`OperatorState`] directly.

use std::sync::Arc;

use hamlet_core::operator::MIN_HOUR_INTERVAL_MS;
use hamlet_core::{OperatorCommand, OperatorState};
use hamlet_types::ThreatSeverity;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// A rejected console line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    /// The first word is not a known command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A required argument is missing.
    #[error("{command} needs an argument")]
    MissingArgument {
        /// The command that was given.
        command: &'static str,
    },

    /// An argument did not parse as a number.
    #[error("not a number: {0}")]
    InvalidNumber(String),

    /// The threat severity is not one of the three tiers.
    #[error("unknown severity: {0} (minor, major, critical)")]
    UnknownSeverity(String),

    /// The requested pace is below the floor.
    #[error("hour interval must be at least {MIN_HOUR_INTERVAL_MS}ms")]
    IntervalTooShort,
}

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
    /// Hold the loop.
    Pause,
    /// Release the loop.
    Resume,
    /// End the run.
    Stop,
    /// Log the operator status.
    Status,
    /// Set the hour interval in milliseconds.
    Speed(u64),
    /// Queue a threat.
    Threat(ThreatSeverity),
    /// Queue a safety restore; `None` uses the configured amount.
    Restore(Option<u32>),
}

/// Parse one console line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleAction>, ConsoleError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let action = match command.to_ascii_lowercase().as_str() {
        "pause" => ConsoleAction::Pause,
        "resume" => ConsoleAction::Resume,
        "stop" => ConsoleAction::Stop,
        "status" => ConsoleAction::Status,
        "speed" => {
            let ms = arg.ok_or(ConsoleError::MissingArgument { command: "speed" })?;
            ConsoleAction::Speed(parse_number(ms)?)
        }
        "threat" => {
            let tier = arg.ok_or(ConsoleError::MissingArgument { command: "threat" })?;
            ConsoleAction::Threat(parse_severity(tier)?)
        }
        "restore" => ConsoleAction::Restore(arg.map(parse_number).transpose()?),
        other => return Err(ConsoleError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(action))
}

fn parse_number<T: std::str::FromStr>(word: &str) -> Result<T, ConsoleError> {
    word.parse()
        .map_err(|_err| ConsoleError::InvalidNumber(word.to_owned()))
}

fn parse_severity(word: &str) -> Result<ThreatSeverity, ConsoleError> {
    match word.to_ascii_lowercase().as_str() {
        "minor" => Ok(ThreatSeverity::Minor),
        "major" => Ok(ThreatSeverity::Major),
        "critical" => Ok(ThreatSeverity::Critical),
        _ => Err(ConsoleError::UnknownSeverity(word.to_owned())),
    }
}

/// Apply a parsed action. Returns a one-line acknowledgement.
pub async fn apply(
    action: ConsoleAction,
    operator: &OperatorState,
    default_restore: u32,
) -> Result<String, ConsoleError> {
    let reply = match action {
        ConsoleAction::Pause => {
            if operator.pause() {
                "Simulation paused".to_owned()
            } else {
                "Simulation already paused".to_owned()
            }
        }
        ConsoleAction::Resume => {
            if operator.resume() {
                "Simulation resumed".to_owned()
            } else {
                "Simulation was not paused".to_owned()
            }
        }
        ConsoleAction::Stop => {
            operator.request_stop();
            "Stop requested".to_owned()
        }
        ConsoleAction::Status => {
            let status = operator.status().await;
            format!(
                "paused={} interval={}ms elapsed={}s pending={} end={:?}",
                status.paused,
                status.hour_interval_ms,
                status.elapsed_seconds,
                status.pending_commands,
                status.end_reason
            )
        }
        ConsoleAction::Speed(ms) => {
            let previous = operator
                .set_hour_interval_ms(ms)
                .ok_or(ConsoleError::IntervalTooShort)?;
            format!("Hour interval changed from {previous}ms to {ms}ms")
        }
        ConsoleAction::Threat(severity) => {
            operator.queue_command(OperatorCommand::Threat(severity)).await;
            format!("Threat ({severity:?}) queued for the next hour")
        }
        ConsoleAction::Restore(amount) => {
            let amount = amount.unwrap_or(default_restore);
            operator
                .queue_command(OperatorCommand::RestoreSafety(amount))
                .await;
            format!("Safety restore of {amount} queued for the next hour")
        }
    };
    Ok(reply)
}

/// Read commands from stdin until it closes or a stop is applied.
///
/// Lines are read on a plain thread and forwarded over a channel, so a
/// blocked read never holds up runtime shutdown.
pub fn spawn_console(
    operator: Arc<OperatorState>,
    default_restore: u32,
) -> tokio::task::JoinHandle<()> {
    let (tx, mut rx) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Console read failed");
                    return;
                }
            }
        }
    });

    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            let outcome = match parse_line(&line) {
                Ok(Some(action)) => apply(action, &operator, default_restore).await,
                Ok(None) => continue,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(reply) => info!(command = line.trim(), "{reply}"),
                Err(e) => warn!(command = line.trim(), error = %e, "Console command rejected"),
            }
            if operator.is_stop_requested() {
                return;
            }
        }
        info!("Console input closed");
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hamlet_core::config::SimulationBoundsConfig;

    use super::*;

    fn controls() -> OperatorState {
        OperatorState::new(1000, &SimulationBoundsConfig::default())
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(parse_line("pause").unwrap(), Some(ConsoleAction::Pause));
        assert_eq!(parse_line(" RESUME ").unwrap(), Some(ConsoleAction::Resume));
        assert_eq!(parse_line("speed 250").unwrap(), Some(ConsoleAction::Speed(250)));
        assert_eq!(
            parse_line("threat Critical").unwrap(),
            Some(ConsoleAction::Threat(ThreatSeverity::Critical))
        );
        assert_eq!(parse_line("restore").unwrap(), Some(ConsoleAction::Restore(None)));
        assert_eq!(parse_line("restore 30").unwrap(), Some(ConsoleAction::Restore(Some(30))));
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!(
            parse_line("dance"),
            Err(ConsoleError::UnknownCommand("dance".to_owned()))
        );
        assert_eq!(
            parse_line("speed"),
            Err(ConsoleError::MissingArgument { command: "speed" })
        );
        assert_eq!(
            parse_line("speed fast"),
            Err(ConsoleError::InvalidNumber("fast".to_owned()))
        );
        assert_eq!(
            parse_line("threat dragons"),
            Err(ConsoleError::UnknownSeverity("dragons".to_owned()))
        );
    }

    #[tokio::test]
    async fn pause_resume_and_speed_reach_the_controls() {
        let op = controls();
        apply(ConsoleAction::Pause, &op, 50).await.unwrap();
        assert!(op.is_paused());
        apply(ConsoleAction::Resume, &op, 50).await.unwrap();
        assert!(!op.is_paused());

        apply(ConsoleAction::Speed(200), &op, 50).await.unwrap();
        assert_eq!(op.hour_interval_ms(), 200);
        assert_eq!(
            apply(ConsoleAction::Speed(1), &op, 50).await,
            Err(ConsoleError::IntervalTooShort)
        );
        assert_eq!(op.hour_interval_ms(), 200);
    }

    #[tokio::test]
    async fn village_commands_are_queued() {
        let op = controls();
        apply(ConsoleAction::Threat(ThreatSeverity::Minor), &op, 50)
            .await
            .unwrap();
        apply(ConsoleAction::Restore(None), &op, 50).await.unwrap();
        apply(ConsoleAction::Restore(Some(5)), &op, 50).await.unwrap();
        assert_eq!(
            op.drain_commands().await,
            vec![
                OperatorCommand::Threat(ThreatSeverity::Minor),
                OperatorCommand::RestoreSafety(50),
                OperatorCommand::RestoreSafety(5),
            ]
        );
    }

    #[tokio::test]
    async fn stop_is_applied() {
        let op = controls();
        apply(ConsoleAction::Stop, &op, 50).await.unwrap();
        assert!(op.is_stop_requested());
    }
}
