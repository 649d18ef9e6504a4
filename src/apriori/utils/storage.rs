use super::super::ItemId;

/// Flat storage for itemsets of one level: members are packed into a single
/// buffer and addressed through `(start, len)` offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemsetStorage {
    pub items: Vec<ItemId>,
    pub offsets: Vec<(usize, usize)>,
    pub supports: Vec<usize>,
}

/// One level `L_k` of the lattice: every itemset has exactly `itemset_size`
/// members in strictly increasing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequentLevel {
    pub storage: ItemsetStorage,
    pub itemset_size: usize,
}

impl ItemsetStorage {
    pub(crate) fn new() -> Self {
        Self { items: Vec::new(), offsets: Vec::new(), supports: Vec::new() }
    }

    pub(crate) fn with_capacity(estimated_items: usize, estimated_itemsets: usize) -> Self {
        Self {
            items: Vec::with_capacity(estimated_items),
            offsets: Vec::with_capacity(estimated_itemsets),
            supports: Vec::with_capacity(estimated_itemsets),
        }
    }

    pub(crate) fn add_itemset_with_support(&mut self, items: &[ItemId], support: usize) {
        debug_assert!(
            items.windows(2).all(|w| w[0] < w[1]),
            "itemset members must be strictly increasing: {items:?}"
        );
        let start = self.items.len();
        self.items.extend_from_slice(items);
        self.offsets.push((start, items.len()));
        self.supports.push(support);
    }

    pub(crate) fn get_itemset(&self, idx: usize) -> &[ItemId] {
        let (start, len) = self.offsets[idx];
        &self.items[start..start + len]
    }

    pub(crate) fn len(&self) -> usize {
        self.offsets.len()
    }
}

impl FrequentLevel {
    pub fn new(itemset_size: usize) -> Self {
        Self { storage: ItemsetStorage::new(), itemset_size }
    }

    pub fn with_capacity(itemset_size: usize, estimated_itemsets: usize) -> Self {
        let estimated_items = estimated_itemsets * itemset_size;
        Self {
            storage: ItemsetStorage::with_capacity(estimated_items, estimated_itemsets),
            itemset_size,
        }
    }

    pub fn add_itemset_with_support(&mut self, items: &[ItemId], support: usize) -> usize {
        debug_assert_eq!(items.len(), self.itemset_size);
        self.storage.add_itemset_with_support(items, support);
        self.storage.len() - 1
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.len() == 0
    }

    pub fn get_itemset(&self, idx: usize) -> &[ItemId] {
        self.storage.get_itemset(idx)
    }

    pub fn support(&self, idx: usize) -> usize {
        self.storage.supports[idx]
    }

    pub fn iter_itemsets(&self) -> impl Iterator<Item = &[ItemId]> {
        (0..self.storage.len()).map(move |idx| self.get_itemset(idx))
    }

    /// Itemsets paired with their support counts, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[ItemId], usize)> {
        (0..self.storage.len()).map(move |idx| (self.get_itemset(idx), self.support(idx)))
    }

    /// Support of `members`, if the itemset is part of this level.
    pub fn support_of(&self, members: &[ItemId]) -> Option<usize> {
        self.iter().find(|(itemset, _)| *itemset == members).map(|(_, support)| support)
    }

    pub fn contains(&self, members: &[ItemId]) -> bool {
        self.support_of(members).is_some()
    }

    /// Appends every itemset of `other`, which must have the same size.
    pub(crate) fn extend_from(&mut self, other: &FrequentLevel) {
        debug_assert_eq!(self.itemset_size, other.itemset_size);
        for (members, support) in other.iter() {
            self.storage.add_itemset_with_support(members, support);
        }
    }
}
