//! Enemy and quest catalog loaders.

use std::path::Path;

use game_core::env::{EnemyDefinition, EnvironmentalCondition, QuestDefinition, QuestReward};
use game_core::state::{EnemyId, QuestId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_ron};

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemyDefinition>,
}

pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyDefinition>> {
        let catalog: EnemyCatalog = read_ron(path, "enemy catalog")?;

        Ok(catalog.enemies)
    }
}

/// A quest as written in `quests.ron`: the definition plus its weather.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestEntry {
    pub id: QuestId,
    pub name: String,
    pub enemies: Vec<EnemyId>,
    #[serde(default)]
    pub reward: QuestReward,
    #[serde(default)]
    pub environment: Option<EnvironmentalCondition>,
}

impl QuestEntry {
    pub fn into_parts(self) -> (QuestDefinition, Option<EnvironmentalCondition>) {
        let definition = QuestDefinition {
            id: self.id,
            name: self.name,
            enemies: self.enemies,
            reward: self.reward,
        };
        (definition, self.environment)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuestCatalog {
    quests: Vec<QuestEntry>,
}

pub struct QuestLoader;

impl QuestLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<QuestEntry>> {
        let catalog: QuestCatalog = read_ron(path, "quest catalog")?;

        Ok(catalog.quests)
    }
}
