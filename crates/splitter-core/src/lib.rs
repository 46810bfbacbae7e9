pub mod list;
pub mod reconcile;
pub mod splitter;
pub mod types;

pub use list::ShoppingList;
pub use splitter::{expand_units, pack_multi_target, pack_single_target, Splitter};
pub use types::*;
