//! Content loaders for reading game data from files.
//!
//! Each loader turns one RON/TOML file into `game-core` reference types; the
//! [`ContentFactory`] assembles them into a [`Catalog`](crate::Catalog).

pub mod abilities;
pub mod combos;
pub mod config;
pub mod factory;
pub mod heroes;
pub mod items;
pub mod quests;

pub use abilities::{AbilityLoader, ClassAbility};
pub use combos::{ComboCatalog, ComboLoader, Discovery};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use heroes::{HeroLoader, ProgressionLoader};
pub use items::ItemLoader;
pub use quests::{EnemyLoader, QuestEntry, QuestLoader};

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Reads and parses one RON catalog; `what` names it in the error.
pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content).map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", what, e))
}
