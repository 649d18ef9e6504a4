use rayon::prelude::*;

use super::support::{MinSupport, SupportCounter};
use super::utils::FrequentLevel;
use super::ItemId;
use crate::error::StoreResult;
use crate::store::TransactionStore;

/// Level 1: every catalog item whose own support meets the threshold.
pub fn generate_first_level<S>(store: &S, min_support: MinSupport) -> StoreResult<FrequentLevel>
where
    S: TransactionStore,
{
    let catalog = store.item_catalog()?;
    let mut level = FrequentLevel::with_capacity(1, catalog.len());

    for item in catalog {
        let support = store.support_of(item)?;
        if min_support.is_met_by(support) {
            level.add_itemset_with_support(&[item], support);
        }
    }

    Ok(level)
}

/// Frequent one-item extensions of a single prefix.
///
/// Only the prefix itself is known to be frequent; the other `k-1` subsets of
/// the candidate are never checked.
pub fn extend_prefix<S>(
    store: &S,
    prefix: &[ItemId],
    min_support: MinSupport,
) -> StoreResult<FrequentLevel>
where
    S: TransactionStore,
{
    let Some(&last) = prefix.last() else {
        return Ok(FrequentLevel::new(1));
    };

    let mut counter = SupportCounter::new();
    store.co_occurring_extension(prefix, |item, transaction| {
        if item > last {
            counter.observe(item, transaction);
        }
    })?;

    let mut extended = FrequentLevel::new(prefix.len() + 1);
    let mut candidate = Vec::with_capacity(prefix.len() + 1);
    for (item, support) in counter.into_frequent(min_support) {
        candidate.clear();
        candidate.extend_from_slice(prefix);
        candidate.push(item);
        extended.add_itemset_with_support(&candidate, support);
    }

    tracing::trace!(prefix = ?prefix, extensions = extended.len(), "extended prefix");
    Ok(extended)
}

/// Level `k + 1` from level `k`, one prefix at a time.
pub fn generate_next_level<S>(
    store: &S,
    previous: &FrequentLevel,
    min_support: MinSupport,
) -> StoreResult<FrequentLevel>
where
    S: TransactionStore,
{
    let mut next = FrequentLevel::new(previous.itemset_size + 1);
    for prefix in previous.iter_itemsets() {
        next.extend_from(&extend_prefix(store, prefix, min_support)?);
    }
    Ok(next)
}

/// Same as [`generate_next_level`], with prefixes extended on the rayon pool.
///
/// Per-prefix results are merged in prefix order, so the level is identical to
/// the sequential one.
pub fn generate_next_level_parallel<S>(
    store: &S,
    previous: &FrequentLevel,
    min_support: MinSupport,
) -> StoreResult<FrequentLevel>
where
    S: TransactionStore + Sync,
{
    let prefixes: Vec<&[ItemId]> = previous.iter_itemsets().collect();

    let per_prefix: Vec<FrequentLevel> = prefixes
        .par_iter()
        .map(|prefix| extend_prefix(store, prefix, min_support))
        .collect::<StoreResult<_>>()?;

    let mut next = FrequentLevel::new(previous.itemset_size + 1);
    for extended in &per_prefix {
        next.extend_from(extended);
    }
    Ok(next)
}
