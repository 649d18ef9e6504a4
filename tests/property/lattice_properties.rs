use std::collections::BTreeSet;

use levelwise::{
    run_mining, ItemId, LatticeDriver, MemoryStore, MinSupport, NullSink, SqliteStore,
};
use proptest::prelude::*;

const UNIVERSE: ItemId = 8;

fn transactions() -> impl Strategy<Value = Vec<Vec<ItemId>>> {
    prop::collection::vec(prop::collection::vec(0..UNIVERSE, 0..6), 0..16)
}

fn store_from(transactions: &[Vec<ItemId>]) -> MemoryStore {
    MemoryStore::from_transactions(
        transactions.iter().enumerate().map(|(tx, items)| (tx as i64, items.clone())),
    )
}

/// Every itemset over the universe whose support meets `min_support`,
/// grouped by size.
fn brute_force(transactions: &[Vec<ItemId>], min_support: usize) -> Vec<BTreeSet<(Vec<ItemId>, usize)>> {
    let sets: Vec<BTreeSet<ItemId>> =
        transactions.iter().map(|items| items.iter().copied().collect()).collect();
    let mut by_size: Vec<BTreeSet<(Vec<ItemId>, usize)>> = vec![BTreeSet::new(); UNIVERSE as usize];

    for mask in 1u32..(1 << UNIVERSE) {
        let members: Vec<ItemId> = (0..UNIVERSE).filter(|item| mask & (1 << item) != 0).collect();
        let support = sets
            .iter()
            .filter(|set| members.iter().all(|item| set.contains(item)))
            .count();
        if support >= min_support {
            by_size[members.len() - 1].insert((members, support));
        }
    }

    while by_size.last().is_some_and(BTreeSet::is_empty) {
        by_size.pop();
    }
    by_size
}

proptest! {
    #[test]
    fn every_itemset_has_a_frequent_prefix(
        txs in transactions(),
        min_support in 1i64..4,
    ) {
        let run = run_mining(&store_from(&txs), min_support).unwrap();
        for k in 2..=run.last_nonempty_k() {
            let previous = run.level(k - 1).unwrap();
            for members in run.level(k).unwrap().iter_itemsets() {
                prop_assert!(
                    previous.contains(&members[..k - 1]),
                    "prefix of {:?} missing from L{}", members, k - 1
                );
            }
        }
    }

    #[test]
    fn itemsets_meet_threshold_and_are_canonical(
        txs in transactions(),
        min_support in 1i64..4,
    ) {
        let run = run_mining(&store_from(&txs), min_support).unwrap();
        for (idx, level) in run.levels().iter().enumerate() {
            prop_assert_eq!(level.itemset_size, idx + 1);
            let mut seen = BTreeSet::new();
            for (members, support) in level.iter() {
                prop_assert!(support >= min_support as usize);
                prop_assert!(members.windows(2).all(|w| w[0] < w[1]), "{:?}", members);
                prop_assert!(seen.insert(members.to_vec()), "duplicate {:?}", members);
            }
        }
    }

    #[test]
    fn run_terminates_within_largest_transaction(
        txs in transactions(),
        min_support in 1i64..4,
    ) {
        let store = store_from(&txs);
        let run = run_mining(&store, min_support).unwrap();
        prop_assert!(run.last_nonempty_k() <= store.max_transaction_size());
        prop_assert_eq!(run.levels().len(), run.last_nonempty_k());
    }

    #[test]
    fn levels_match_brute_force(
        txs in transactions(),
        min_support in 1i64..4,
    ) {
        let run = run_mining(&store_from(&txs), min_support).unwrap();
        let expected = brute_force(&txs, min_support as usize);

        prop_assert_eq!(run.last_nonempty_k(), expected.len());
        for (level, want) in run.levels().iter().zip(&expected) {
            let got: BTreeSet<(Vec<ItemId>, usize)> =
                level.iter().map(|(members, support)| (members.to_vec(), support)).collect();
            prop_assert_eq!(&got, want);
        }
    }

    #[test]
    fn mining_is_deterministic(
        txs in transactions(),
        min_support in 1i64..4,
    ) {
        let store = store_from(&txs);
        let driver = LatticeDriver::new(&store, MinSupport::new(min_support).unwrap());
        let first = driver.run(&NullSink).unwrap();
        let second = driver.run(&NullSink).unwrap();
        let parallel = driver.run_parallel(&NullSink).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &parallel);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sqlite_and_memory_stores_agree(
        txs in transactions(),
        min_support in 1i64..4,
    ) {
        let sqlite = SqliteStore::open_in_memory().unwrap();
        for (tx, items) in txs.iter().enumerate() {
            for &item in items {
                sqlite.insert_membership(tx as i64, item).unwrap();
            }
        }

        let from_memory = run_mining(&store_from(&txs), min_support).unwrap();
        let from_sqlite = run_mining(&sqlite, min_support).unwrap();
        prop_assert_eq!(from_memory.last_nonempty_k(), from_sqlite.last_nonempty_k());
        for (mem, sql) in from_memory.levels().iter().zip(from_sqlite.levels()) {
            let mem: BTreeSet<_> = mem.iter().map(|(m, s)| (m.to_vec(), s)).collect();
            let sql: BTreeSet<_> = sql.iter().map(|(m, s)| (m.to_vec(), s)).collect();
            prop_assert_eq!(mem, sql);
        }
    }
}
