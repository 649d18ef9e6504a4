//! Data cleaning: two SQL scripts run verbatim, in order, before mining.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{MiningError, MiningResult};
use crate::store::ScriptExecutor;

pub const INTEGRITY_CHECKS_SCRIPT: &str = "integrity_checks.sql";
pub const REMOVALS_SCRIPT: &str = "removals.sql";

/// Locations of the cleaning scripts, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleaningScripts {
    pub integrity_checks: PathBuf,
    pub removals: PathBuf,
}

impl CleaningScripts {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            integrity_checks: dir.join(INTEGRITY_CHECKS_SCRIPT),
            removals: dir.join(REMOVALS_SCRIPT),
        }
    }

    fn ordered(&self) -> [&Path; 2] {
        [self.integrity_checks.as_path(), self.removals.as_path()]
    }
}

/// Runs the integrity checks, then the removals.
///
/// Each script commits on its own; a failure in the second leaves the effects
/// of the first in place.
pub fn run_cleaning<E: ScriptExecutor>(executor: &E, scripts: &CleaningScripts) -> MiningResult<()> {
    let started = Instant::now();
    tracing::info!("commencing database cleaning");

    for path in scripts.ordered() {
        let sql = std::fs::read_to_string(path)
            .map_err(|source| MiningError::Script { path: path.to_path_buf(), source })?;
        tracing::debug!(script = %path.display(), "executing cleaning script");
        executor.execute_script(&sql)?;
    }

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "data cleaning complete"
    );
    Ok(())
}
