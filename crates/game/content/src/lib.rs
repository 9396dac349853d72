//! Data-driven reference content and loaders.
//!
//! This crate houses the static data combat sessions read through the
//! `game-core` oracles:
//! - Hero roster, equipment, and experience thresholds
//! - Enemies and quests, including boss phases and environmental conditions
//! - Class special abilities
//! - Party combos, boss weaknesses, and per-player discoveries
//! - Engine configuration (TOML)
//!
//! Content is consumed by the runtime and never appears in session state.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{Catalog, CatalogError, HeroRecord, ItemDefinition, Progression};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory};
