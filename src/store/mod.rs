//! Transaction stores: the data source the lattice is mined from, and the sink
//! that persisted levels are written to.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::apriori::{FrequentLevel, ItemId, TransactionId};
use crate::error::StoreResult;

/// Read-only access to grouped item co-occurrence data.
pub trait TransactionStore {
    /// Distinct item ids that occur in at least one transaction, ascending.
    fn item_catalog(&self) -> StoreResult<Vec<ItemId>>;

    /// Number of distinct transactions containing `item`.
    fn support_of(&self, item: ItemId) -> StoreResult<usize>;

    /// Streams `(extension, transaction)` pairs where `extension` shares
    /// `transaction` with every member of `prefix` and `extension > max(prefix)`.
    ///
    /// Each call re-queries the source. An empty prefix yields nothing.
    fn co_occurring_extension<F>(&self, prefix: &[ItemId], visit: F) -> StoreResult<()>
    where
        F: FnMut(ItemId, TransactionId);

    /// Display name of `item`, `None` when the catalog has no entry for it.
    fn name_of(&self, item: ItemId) -> StoreResult<Option<String>>;
}

/// Receives levels as the lattice driver materializes them.
pub trait LevelSink {
    /// Called once before level 1 is computed.
    fn begin_run(&self) -> StoreResult<()> {
        Ok(())
    }

    fn persist_level(&self, level: &FrequentLevel) -> StoreResult<()>;

    /// The level of size `itemset_size` came out empty and ended the run.
    fn discard_level(&self, itemset_size: usize) -> StoreResult<()>;
}

/// Sink that keeps nothing beyond the in-memory `MiningRun`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LevelSink for NullSink {
    fn persist_level(&self, _level: &FrequentLevel) -> StoreResult<()> {
        Ok(())
    }

    fn discard_level(&self, _itemset_size: usize) -> StoreResult<()> {
        Ok(())
    }
}

/// Runs opaque SQL scripts against the backing store.
pub trait ScriptExecutor {
    fn execute_script(&self, sql: &str) -> StoreResult<()>;
}
