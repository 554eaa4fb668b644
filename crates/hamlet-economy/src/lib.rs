//! Village economy for the Hamlet simulation.
//!
//! Goods live in capacity-bounded storages. Villagers turn goods into other
//! goods by following the recipe for their trade: inputs leave a storage
//! when work starts, output arrives after the recipe's duration. Nothing is
//! created past a storage's capacity, and transfers between storages never
//! create or destroy goods.
//!
//! # Modules
//!
//! - [`storage`] -- [`Storage`]: a multi-resource store with shared capacity.
//! - [`recipe`] -- The fixed per-trade recipe table.
//! - [`production`] -- [`ResourceManager`]: storages, production tasks, and
//!   transfers.

pub mod production;
pub mod recipe;
pub mod storage;

pub use production::{DEFAULT_HISTORY_LIMIT, ResourceManager, ResourceTotal};
pub use recipe::{Recipe, recipe_for};
pub use storage::Storage;
