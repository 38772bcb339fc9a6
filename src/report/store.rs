//! Report persistence
//!
//! The previous report is best-effort input: a missing or corrupt file means
//! empty history, never a failed run. The new report is written through a
//! sibling temp file and renamed into place so a crash mid-write leaves the
//! last good report intact.

use crate::report::status::RunReport;
use crate::Result;
use std::path::{Path, PathBuf};

/// Loads the previous run's report, degrading to empty history on any problem
pub fn load_previous(path: &Path) -> RunReport {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No previous report at {}, starting fresh", path.display());
            return RunReport::empty();
        }
        Err(e) => {
            tracing::warn!(
                "Could not read previous report at {}: {}, starting fresh",
                path.display(),
                e
            );
            return RunReport::empty();
        }
    };

    match serde_json::from_str(&content) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!(
                "Previous report at {} is corrupt ({}), starting fresh",
                path.display(),
                e
            );
            RunReport::empty()
        }
    }
}

/// Atomically replaces the persisted report
pub fn save(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    let temp_path = temp_sibling(path);
    std::fs::write(&temp_path, json)?;
    std::fs::rename(&temp_path, path)?;

    tracing::info!("Report saved to {}", path.display());
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut os_string = path.as_os_str().to_owned();
    os_string.push(".tmp");
    PathBuf::from(os_string)
}
