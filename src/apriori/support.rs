use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use super::{ItemId, TransactionId};
use crate::error::{MiningError, MiningResult};

/// Inclusive lower bound on support; always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinSupport(usize);

impl MinSupport {
    pub fn new(value: i64) -> MiningResult<Self> {
        if value < 1 {
            return Err(MiningError::invalid_config(format!(
                "minimum support must be at least 1, got {value}"
            )));
        }
        Ok(Self(value as usize))
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn is_met_by(self, count: usize) -> bool {
        count >= self.0
    }
}

impl FromStr for MinSupport {
    type Err = MiningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s.trim().parse().map_err(|_| {
            MiningError::invalid_config(format!("minimum support must be an integer, got {s:?}"))
        })?;
        Self::new(value)
    }
}

impl fmt::Display for MinSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Groups `(extension, transaction)` pairs by extension item and counts the
/// distinct transactions in each group.
#[derive(Debug, Default)]
pub struct SupportCounter {
    groups: BTreeMap<ItemId, HashSet<TransactionId>>,
}

impl SupportCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, item: ItemId, transaction: TransactionId) {
        self.groups.entry(item).or_default().insert(transaction);
    }

    pub fn count(&self, item: ItemId) -> usize {
        self.groups.get(&item).map_or(0, HashSet::len)
    }

    /// Groups meeting `min_support`, ascending by item.
    pub fn into_frequent(self, min_support: MinSupport) -> impl Iterator<Item = (ItemId, usize)> {
        self.groups
            .into_iter()
            .map(|(item, transactions)| (item, transactions.len()))
            .filter(move |&(_, count)| min_support.is_met_by(count))
    }
}
