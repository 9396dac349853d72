//! Hero roster and level progression loaders.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{HeroRecord, Progression};
use crate::loaders::{LoadResult, read_file, read_ron};

/// Hero roster structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroRoster {
    pub heroes: Vec<HeroRecord>,
}

/// Loader for the hero roster from RON files.
pub struct HeroLoader;

impl HeroLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<HeroRecord>> {
        let roster: HeroRoster = read_ron(path, "hero roster")?;

        Ok(roster.heroes)
    }
}

/// Loader for the experience table from TOML files.
pub struct ProgressionLoader;

impl ProgressionLoader {
    pub fn load(path: &Path) -> LoadResult<Progression> {
        let content = read_file(path)?;
        let progression: Progression = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse progression TOML: {}", e))?;

        Ok(progression)
    }
}
