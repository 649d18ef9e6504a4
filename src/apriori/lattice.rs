use std::time::Instant;

use super::candidates::{generate_first_level, generate_next_level, generate_next_level_parallel};
use super::support::MinSupport;
use super::utils::FrequentLevel;
use crate::error::{MiningResult, StoreResult};
use crate::store::{LevelSink, TransactionStore};

/// Phase of the level-wise loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Seed,
    /// `k` is the size of the largest level stored so far.
    Grow { k: usize },
    Terminal { last_nonempty_k: usize },
}

/// Result of a completed run: `levels[k - 1]` holds `L_k` for
/// `k in 1..=last_nonempty_k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiningRun {
    min_support: MinSupport,
    levels: Vec<FrequentLevel>,
    last_nonempty_k: usize,
}

impl MiningRun {
    pub fn min_support(&self) -> MinSupport {
        self.min_support
    }

    pub fn last_nonempty_k(&self) -> usize {
        self.last_nonempty_k
    }

    pub fn levels(&self) -> &[FrequentLevel] {
        &self.levels
    }

    /// `L_k`, or `None` when `k` is 0 or past the last non-empty level.
    pub fn level(&self, k: usize) -> Option<&FrequentLevel> {
        k.checked_sub(1).and_then(|idx| self.levels.get(idx))
    }

    /// The level projected for output: `L_last_nonempty_k`.
    pub fn final_level(&self) -> Option<&FrequentLevel> {
        self.level(self.last_nonempty_k)
    }

    pub fn total_itemsets(&self) -> usize {
        self.levels.iter().map(FrequentLevel::len).sum()
    }
}

/// Drives `Seed -> Grow(k) -> ... -> Terminal` over one store.
pub struct LatticeDriver<'s, S> {
    store: &'s S,
    min_support: MinSupport,
}

impl<'s, S: TransactionStore> LatticeDriver<'s, S> {
    pub fn new(store: &'s S, min_support: MinSupport) -> Self {
        Self { store, min_support }
    }

    /// Run to completion, reporting each stored level to `sink`.
    pub fn run<K: LevelSink>(&self, sink: &K) -> MiningResult<MiningRun> {
        self.drive(sink, |previous| generate_next_level(self.store, previous, self.min_support))
    }

    fn drive<K, G>(&self, sink: &K, mut grow: G) -> MiningResult<MiningRun>
    where
        K: LevelSink,
        G: FnMut(&FrequentLevel) -> StoreResult<FrequentLevel>,
    {
        let started = Instant::now();
        tracing::info!(min_support = %self.min_support, "commencing itemset mining");

        let mut levels: Vec<FrequentLevel> = Vec::new();
        let mut state = DriverState::Seed;

        let last_nonempty_k = loop {
            state = match state {
                DriverState::Seed => {
                    sink.begin_run()?;
                    let first = generate_first_level(self.store, self.min_support)?;
                    if first.is_empty() {
                        tracing::info!("no item meets the minimum support");
                        DriverState::Terminal { last_nonempty_k: 0 }
                    } else {
                        tracing::info!(k = 1, rows = first.len(), "created level");
                        sink.persist_level(&first)?;
                        levels.push(first);
                        DriverState::Grow { k: 1 }
                    }
                }
                DriverState::Grow { k } => {
                    let next = grow(&levels[k - 1])?;
                    if next.is_empty() {
                        tracing::warn!(k = k + 1, "level empty, discarding");
                        sink.discard_level(k + 1)?;
                        DriverState::Terminal { last_nonempty_k: k }
                    } else {
                        tracing::info!(k = k + 1, rows = next.len(), "created level");
                        sink.persist_level(&next)?;
                        levels.push(next);
                        DriverState::Grow { k: k + 1 }
                    }
                }
                DriverState::Terminal { last_nonempty_k } => break last_nonempty_k,
            };
        };

        tracing::info!(
            last_nonempty_k,
            itemsets = levels.iter().map(FrequentLevel::len).sum::<usize>(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "itemset mining complete"
        );

        Ok(MiningRun { min_support: self.min_support, levels, last_nonempty_k })
    }
}

impl<'s, S: TransactionStore + Sync> LatticeDriver<'s, S> {
    /// Like [`LatticeDriver::run`], extending the prefixes of each level in
    /// parallel. Levels are still built strictly one after another.
    pub fn run_parallel<K: LevelSink>(&self, sink: &K) -> MiningResult<MiningRun> {
        self.drive(sink, |previous| {
            generate_next_level_parallel(self.store, previous, self.min_support)
        })
    }
}
