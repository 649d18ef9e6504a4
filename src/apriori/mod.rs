pub mod candidates;
pub mod lattice;
pub mod projection;
pub mod support;
pub mod utils;


pub use candidates::{generate_first_level, generate_next_level, generate_next_level_parallel};
pub use lattice::{DriverState, LatticeDriver, MiningRun};
pub use projection::{project_level, ProjectedItemset};
pub use support::{MinSupport, SupportCounter};
pub use utils::{FrequentLevel, ItemsetStorage};

/// Identifier of an item in the catalog.
pub type ItemId = i64;

/// Identifier of a transaction (the grouping unit items co-occur in).
pub type TransactionId = i64;
