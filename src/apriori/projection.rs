use std::collections::HashMap;
use std::fmt;

use super::utils::FrequentLevel;
use super::ItemId;
use crate::error::{MiningError, MiningResult};
use crate::store::TransactionStore;

/// An itemset with its members resolved to display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedItemset {
    pub names: Vec<String>,
    pub count: usize,
}

impl fmt::Display for ProjectedItemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) count = {}", self.names.join(", "), self.count)
    }
}

/// Resolve every member of every itemset in `level` to its name.
///
/// Fails on the first id missing from the catalog; no partial output.
pub fn project_level<S: TransactionStore>(
    store: &S,
    level: &FrequentLevel,
) -> MiningResult<Vec<ProjectedItemset>> {
    let mut names: HashMap<ItemId, String> = HashMap::new();
    let mut projected = Vec::with_capacity(level.len());

    for (members, count) in level.iter() {
        let mut row = Vec::with_capacity(members.len());
        for &item in members {
            if let Some(name) = names.get(&item) {
                row.push(name.clone());
                continue;
            }
            let name = store
                .name_of(item)?
                .ok_or(MiningError::NotFound { item_id: item })?;
            names.insert(item, name.clone());
            row.push(name);
        }
        projected.push(ProjectedItemset { names: row, count });
    }

    Ok(projected)
}
