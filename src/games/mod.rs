pub mod catalog;
pub mod types;

pub use catalog::{default_games, GameCatalog, MemoryCatalog};
pub use types::*;
