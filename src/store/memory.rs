use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

use super::TransactionStore;
use crate::apriori::{ItemId, TransactionId};
use crate::error::StoreResult;

/// In-memory index over transactions: item -> transactions and
/// transaction -> items, plus the item name directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    item_transactions: BTreeMap<ItemId, BTreeSet<TransactionId>>,
    transaction_items: BTreeMap<TransactionId, BTreeSet<ItemId>>,
    names: HashMap<ItemId, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from `(transaction_id, items)` groups.
    pub fn from_transactions<I, T>(transactions: I) -> Self
    where
        I: IntoIterator<Item = (TransactionId, T)>,
        T: IntoIterator<Item = ItemId>,
    {
        let mut store = Self::new();
        for (transaction, items) in transactions {
            for item in items {
                store.insert_membership(transaction, item);
            }
        }
        store
    }

    pub fn insert_membership(&mut self, transaction: TransactionId, item: ItemId) {
        self.item_transactions.entry(item).or_default().insert(transaction);
        self.transaction_items.entry(transaction).or_default().insert(item);
    }

    pub fn insert_item(&mut self, item: ItemId, name: impl Into<String>) {
        self.names.insert(item, name.into());
    }

    pub fn with_names<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = (ItemId, N)>,
        N: Into<String>,
    {
        for (item, name) in names {
            self.insert_item(item, name);
        }
        self
    }

    pub fn num_transactions(&self) -> usize {
        self.transaction_items.len()
    }

    /// Size of the largest transaction; no itemset can be longer.
    pub fn max_transaction_size(&self) -> usize {
        self.transaction_items.values().map(BTreeSet::len).max().unwrap_or(0)
    }

    /// Transactions that contain every member of `prefix`.
    fn covering_transactions(&self, prefix: &[ItemId]) -> Vec<TransactionId> {
        let mut sets = Vec::with_capacity(prefix.len());
        for item in prefix {
            match self.item_transactions.get(item) {
                Some(set) => sets.push(set),
                None => return Vec::new(),
            }
        }
        // Intersect starting from the rarest member.
        sets.sort_by_key(|set| set.len());
        let Some((smallest, rest)) = sets.split_first() else {
            return Vec::new();
        };
        smallest
            .iter()
            .copied()
            .filter(|transaction| rest.iter().all(|set| set.contains(transaction)))
            .collect()
    }
}

impl TransactionStore for MemoryStore {
    fn item_catalog(&self) -> StoreResult<Vec<ItemId>> {
        Ok(self.item_transactions.keys().copied().collect())
    }

    fn support_of(&self, item: ItemId) -> StoreResult<usize> {
        Ok(self.item_transactions.get(&item).map_or(0, BTreeSet::len))
    }

    fn co_occurring_extension<F>(&self, prefix: &[ItemId], mut visit: F) -> StoreResult<()>
    where
        F: FnMut(ItemId, TransactionId),
    {
        let Some(&last) = prefix.iter().max() else {
            return Ok(());
        };

        for transaction in self.covering_transactions(prefix) {
            let Some(items) = self.transaction_items.get(&transaction) else {
                continue;
            };
            for &item in items.range((Bound::Excluded(last), Bound::Unbounded)) {
                visit(item, transaction);
            }
        }
        Ok(())
    }

    fn name_of(&self, item: ItemId) -> StoreResult<Option<String>> {
        Ok(self.names.get(&item).cloned())
    }
}
