//! Level-wise frequent itemset mining over grouped transactions.
//!
//! Starting from single frequent items, each level `L_{k+1}` is grown from the
//! prefixes in `L_k`, counted against a [`TransactionStore`] and pruned by a
//! minimum support. The loop stops at the first empty level; the last
//! non-empty one is projected to item names.

pub mod apriori;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod store;

pub use apriori::{
    project_level, FrequentLevel, ItemId, LatticeDriver, MinSupport, MiningRun, ProjectedItemset,
    TransactionId,
};
pub use cleaning::{run_cleaning, CleaningScripts};
pub use config::{CliOptions, MiningConfig, Mode};
pub use error::{MiningError, MiningResult, StoreError, StoreResult};
pub use store::{LevelSink, MemoryStore, NullSink, ScriptExecutor, SqliteStore, TransactionStore};

/// Mine `store` with the given minimum support, keeping levels in memory only.
pub fn run_mining<S: TransactionStore>(store: &S, min_support: i64) -> MiningResult<MiningRun> {
    let min_support = MinSupport::new(min_support)?;
    LatticeDriver::new(store, min_support).run(&NullSink)
}

/// Mine, report each level to `sink`, then project the final level.
pub fn mine_and_project<S, K>(
    store: &S,
    sink: &K,
    min_support: MinSupport,
) -> MiningResult<(MiningRun, Vec<ProjectedItemset>)>
where
    S: TransactionStore,
    K: LevelSink,
{
    let run = LatticeDriver::new(store, min_support).run(sink)?;
    let rows = match run.final_level() {
        Some(level) => project_level(store, level)?,
        None => Vec::new(),
    };
    Ok((run, rows))
}

/// What [`execute`] did.
#[derive(Debug)]
pub enum Outcome {
    Cleaned,
    Mined { run: MiningRun, rows: Vec<ProjectedItemset> },
}

/// Open the configured SQLite store and run `mode` against it.
///
/// The database file must already exist.
///
/// The connection is held for the whole operation and released when this
/// returns, whatever the result.
pub fn execute(config: &MiningConfig, mode: Mode) -> MiningResult<Outcome> {
    let min_support = match mode {
        Mode::Mine => Some(config.min_support()?),
        Mode::Clean => None,
    };
    let path = config.database_path()?;
    let store = SqliteStore::open_existing(&path)?;
    tracing::debug!(database = %path.display(), ?mode, "opened store");

    match min_support {
        None => {
            run_cleaning(&store, &CleaningScripts::in_dir(&config.scripts_dir))?;
            Ok(Outcome::Cleaned)
        }
        Some(min_support) => {
            if config.parallel {
                tracing::warn!("parallel generation needs a shareable store; SQLite runs sequentially");
            }
            let (run, rows) = mine_and_project(&store, &store, min_support)?;
            Ok(Outcome::Mined { run, rows })
        }
    }
}
