//! Class ability loader.

use std::path::Path;

use game_core::env::{AbilityDefinition, HeroClass};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassAbility {
    pub class: HeroClass,
    pub ability: AbilityDefinition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AbilityCatalog {
    abilities: Vec<ClassAbility>,
}

pub struct AbilityLoader;

impl AbilityLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ClassAbility>> {
        let catalog: AbilityCatalog = read_ron(path, "ability catalog")?;

        Ok(catalog.abilities)
    }
}
