//! Hour callback that persists the village snapshot to disk.
//!
//! At every checkpoint the whole [`WorldSnapshot`] is written as pretty
//! JSON. The file is written next to its final path and renamed into
//! place, so a reader never sees a half-written snapshot.

use std::path::{Path, PathBuf};

use hamlet_core::{HourCallback, HourSummary, Village, WorldSnapshot};
use tracing::{debug, info, warn};

/// Writes a snapshot file at each checkpoint hour.
pub struct StateFileCallback {
    path: Option<PathBuf>,
    writes: u64,
}

impl StateFileCallback {
    /// Create a callback. With no path the callback only logs checkpoints.
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path, writes: 0 }
    }

    /// Number of snapshots written so far.
    pub const fn writes(&self) -> u64 {
        self.writes
    }

    fn write_snapshot(path: &Path, snapshot: &WorldSnapshot) -> std::io::Result<()> {
        let json = snapshot.to_json().map_err(std::io::Error::other)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)
    }
}

impl HourCallback for StateFileCallback {
    fn on_hour(&mut self, summary: &HourSummary, village: &Village) {
        let Some(report) = summary.checkpoint.as_ref() else {
            debug!(
                day = summary.day,
                hour = summary.hour,
                completed = summary.completed.len(),
                "Hour complete"
            );
            return;
        };

        info!(
            day = summary.day,
            checkpoint = ?report.checkpoint,
            critical = report.critical.len(),
            moves = report.moves.len(),
            "Checkpoint reached"
        );

        let Some(path) = self.path.as_deref() else {
            return;
        };
        match Self::write_snapshot(path, &village.snapshot()) {
            Ok(()) => {
                self.writes = self.writes.saturating_add(1);
                debug!(path = %path.display(), "State file written");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to write state file");
            }
        }
    }
}
